//! sreq Core
//!
//! Credential resolution for service-to-service requests. Secrets live in
//! backends such as Consul KV or AWS Secrets Manager; each environment
//! (dev, staging, prod, ...) can be served by a different backend address.
//!
//! ## Resolving credentials
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use sreq_core::config::SreqConfig;
//! use sreq_core::providers::create_provider;
//! use sreq_core::resolver::CredentialResolver;
//! use sreq_core::ResolveContext;
//!
//! let config = SreqConfig::load(SreqConfig::default_path())?;
//! let provider = create_provider(config.provider("consul")?)?;
//!
//! let resolver = CredentialResolver::new(provider);
//! let creds = resolver.resolve("auth-service", &ResolveContext::for_env("staging")).await?;
//! println!("{}", creds.base_url);
//! ```

pub mod errors;
pub mod types;
pub mod logging;
pub mod config;
pub mod providers;
pub mod resolver;

// Re-export commonly used types
pub use errors::{BoxError, ErrorKind, SreqError, SreqResult};

pub use types::{CancellationToken, ResolveContext, ResolvedCredentials};

pub use logging::{ConsoleLogger, Logger, NoOpLogger, SharedLogger};

pub use config::{ProviderConfig, ServiceConfig, SreqConfig};

pub use providers::{
    create_provider, AddressRouter, AwsConfig, AwsSecretsProvider, ConnectionPool, ConsulConfig,
    ConsulProvider, Provider,
};

pub use resolver::CredentialResolver;
