//! Core types shared by providers and callers

mod cancellation;
mod context;
mod credentials;

pub use cancellation::CancellationToken;
pub use context::ResolveContext;
pub use credentials::ResolvedCredentials;
