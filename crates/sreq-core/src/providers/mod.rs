//! Secret providers
//!
//! Every backend implements [`Provider`]. Shared building blocks:
//!
//! - [`resolve_path`]: `{placeholder}` substitution in key templates
//! - [`AddressRouter`]: environment to backend address mapping
//! - [`ConnectionPool`]: one lazily-built client per address
//!
//! Providers are normally built from a config entry through
//! [`create_provider`], which dispatches on the entry's `type`.

mod traits;
mod template;
mod router;
mod pool;
mod consul;
mod aws;
mod registry;

pub use traits::Provider;
pub use template::{resolve_path, resolve_path_simple};
pub use router::AddressRouter;
pub use pool::{ClientFactory, ConnectionPool};

pub use consul::{normalize_address, ClientError, ClientSettings, ConsulClient, ConsulConfig, ConsulProvider};
pub use aws::{AwsConfig, AwsSecretsProvider, DEFAULT_REGION};

pub use registry::{
    create_provider, has_provider_type, list_provider_types, register_provider_type,
    unregister_provider_type, ProviderDefinition, ProviderFactory,
};
