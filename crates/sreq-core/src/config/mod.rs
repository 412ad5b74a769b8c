//! Configuration model
//!
//! - `ProviderConfig`: one secret backend (address routing, token, key templates)
//! - `SreqConfig`: the whole `~/.sreq/config.yaml` file

mod provider;
mod file;

pub use provider::{resolve_token_reference, ProviderConfig, DEFAULT_TIMEOUT_MS};
pub use file::{ServiceConfig, SreqConfig};
