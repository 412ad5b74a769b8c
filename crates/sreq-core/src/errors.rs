//! Error taxonomy shared by every provider and by the credential resolver
//!
//! Every user-facing failure is a [`SreqError`]: a category, a message, the
//! underlying cause (if any) and an actionable suggestion. The constructors
//! below produce one error per failure scenario so the wording stays
//! consistent across call sites.

use std::error::Error as StdError;
use std::fmt;
use std::time::Duration;

/// Boxed cause carried inside a [`SreqError`]
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Result alias used throughout the crate
pub type SreqResult<T> = Result<T, SreqError>;

/// Category of a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Missing or invalid setup (config file, provider address, path template)
    Config,
    /// The backend rejected our credentials
    Auth,
    /// The backend is unreachable or misbehaving
    Provider,
    /// Request-level I/O failure, including cancellation and deadlines
    Network,
    /// A key, secret, service or context does not exist
    NotFound,
    /// Malformed user input
    Validation,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Config => "config",
            ErrorKind::Auth => "auth",
            ErrorKind::Provider => "provider",
            ErrorKind::Network => "network",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Validation => "validation",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A categorized error with an optional cause and suggestion
#[derive(Debug)]
pub struct SreqError {
    kind: ErrorKind,
    message: String,
    cause: Option<BoxError>,
    suggestion: Option<String>,
}

impl SreqError {
    /// Create an error with no cause and no suggestion
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            cause: None,
            suggestion: None,
        }
    }

    /// Wrap an external error with a message
    pub fn wrap(kind: ErrorKind, cause: impl Into<BoxError>, message: impl Into<String>) -> Self {
        Self::new(kind, message).with_cause(cause)
    }

    /// Attach the underlying cause
    pub fn with_cause(mut self, cause: impl Into<BoxError>) -> Self {
        self.cause = Some(cause.into());
        self
    }

    /// Attach an actionable suggestion
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn suggestion(&self) -> Option<&str> {
        self.suggestion.as_deref()
    }

    pub fn cause(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.cause.as_deref()
    }

    pub fn is_not_found(&self) -> bool {
        self.kind == ErrorKind::NotFound
    }

    // ---- configuration ----

    pub fn config_not_found(path: impl fmt::Display) -> Self {
        Self::new(ErrorKind::Config, format!("Configuration file not found: {}", path))
            .with_suggestion("Run 'sreq init' to create the default configuration.")
    }

    pub fn config_parse_error(path: impl fmt::Display, cause: impl Into<BoxError>) -> Self {
        Self::new(ErrorKind::Config, format!("Failed to parse configuration file: {}", path))
            .with_cause(cause)
            .with_suggestion("Check the YAML syntax in your config file. Use a YAML validator if needed.")
    }

    pub fn service_not_found(service: &str) -> Self {
        Self::new(
            ErrorKind::NotFound,
            format!("Service '{}' not found in configuration", service),
        )
        .with_suggestion(format!(
            "Add the service using: sreq service add {} --consul-key <key>",
            service
        ))
    }

    pub fn context_not_found(context: &str) -> Self {
        Self::new(
            ErrorKind::NotFound,
            format!("Context '{}' not found in configuration", context),
        )
        .with_suggestion("Check available contexts in ~/.sreq/config.yaml under the 'contexts' section.")
    }

    pub fn consul_address_required() -> Self {
        Self::new(ErrorKind::Config, "Consul address is not configured")
            .with_suggestion(
                "Set 'address' or at least one entry in 'env_addresses' for the consul provider in ~/.sreq/config.yaml.",
            )
    }

    pub fn path_not_configured(provider: &str, name: &str) -> Self {
        Self::new(
            ErrorKind::Config,
            format!("No path template named '{}' configured for provider '{}'", name, provider),
        )
        .with_suggestion(format!(
            "Add '{}' under providers.{}.paths in ~/.sreq/config.yaml.",
            name, provider
        ))
    }

    // ---- authentication ----

    pub fn consul_auth_failed(address: &str, cause: impl Into<BoxError>) -> Self {
        Self::new(ErrorKind::Auth, format!("Failed to connect to Consul at {}", address))
            .with_cause(cause)
            .with_suggestion(
                "Check that:\n  1. Consul is running and accessible\n  2. The address is correct\n  3. CONSUL_HTTP_TOKEN is set (if required)\n  Run 'sreq auth consul' to reconfigure.",
            )
    }

    pub fn aws_auth_failed(region: &str, cause: impl Into<BoxError>) -> Self {
        Self::new(
            ErrorKind::Auth,
            format!("Failed to authenticate with AWS in region {}", region),
        )
        .with_cause(cause)
        .with_suggestion(
            "Check that:\n  1. AWS credentials are configured (~/.aws/credentials or env vars)\n  2. The IAM user/role has secretsmanager:GetSecretValue permission\n  3. The region is correct\n  Run 'sreq auth aws' to reconfigure.",
        )
    }

    // ---- provider ----

    pub fn provider_not_configured(provider: &str) -> Self {
        Self::new(
            ErrorKind::Provider,
            format!("Provider '{}' is not configured", provider),
        )
        .with_suggestion(format!(
            "Add the provider configuration to ~/.sreq/config.yaml or run 'sreq auth {}'.",
            provider
        ))
    }

    pub fn consul_client_failed(address: &str, cause: impl Into<BoxError>) -> Self {
        Self::new(
            ErrorKind::Config,
            format!("Failed to create Consul client for {}", address),
        )
        .with_cause(cause)
        .with_suggestion("Check the consul address format, e.g. http://consul.internal:8500.")
    }

    pub fn consul_get_failed(key: &str, cause: impl Into<BoxError>) -> Self {
        Self::new(
            ErrorKind::Provider,
            format!("Failed to get key '{}' from Consul", key),
        )
        .with_cause(cause)
        .with_suggestion("Run 'sreq config test' to verify provider connectivity.")
    }

    pub fn consul_list_failed(prefix: &str, cause: impl Into<BoxError>) -> Self {
        Self::new(
            ErrorKind::Provider,
            format!("Failed to list keys with prefix '{}'", prefix),
        )
        .with_cause(cause)
        .with_suggestion("Run 'sreq config test' to verify provider connectivity.")
    }

    pub fn consul_health_failed(address: &str, env: Option<&str>, cause: impl Into<BoxError>) -> Self {
        let message = match env {
            Some(env) => format!("Consul health check failed for {} (env: {})", address, env),
            None => format!("Consul health check failed for {}", address),
        };
        Self::new(ErrorKind::Provider, message)
            .with_cause(cause)
            .with_suggestion("Check that the Consul agent is running and reachable from this machine.")
    }

    pub fn aws_not_available(region: &str, key: &str) -> Self {
        Self::new(
            ErrorKind::Provider,
            format!(
                "AWS Secrets Manager lookups are not implemented yet (secret '{}', region {})",
                key, region
            ),
        )
        .with_suggestion("Use the consul provider for this service until AWS support lands.")
    }

    pub fn credential_resolution_failed(service: &str, env: &str, cause: impl Into<BoxError>) -> Self {
        Self::new(
            ErrorKind::Provider,
            format!(
                "Failed to resolve credentials for service '{}' in environment '{}'",
                service, env
            ),
        )
        .with_cause(cause)
        .with_suggestion("Run 'sreq config test' to verify provider connectivity.")
    }

    // ---- not found ----

    pub fn secret_not_found(provider: &str, key: &str) -> Self {
        Self::new(
            ErrorKind::NotFound,
            format!("Secret '{}' not found in {}", key, provider),
        )
        .with_suggestion(
            "Check that:\n  1. The secret path is correct\n  2. You have permission to access the secret\n  3. The secret exists in the specified environment",
        )
    }

    pub fn consul_key_not_found(key: &str) -> Self {
        Self::secret_not_found("consul", key)
    }

    // ---- network ----

    pub fn request_failed(url: &str, cause: impl Into<BoxError>) -> Self {
        Self::new(ErrorKind::Network, format!("HTTP request failed: {}", url))
            .with_cause(cause)
            .with_suggestion(
                "Check that:\n  1. The service URL is correct and accessible\n  2. Your network connection is working\n  3. Any required VPN is connected",
            )
    }

    pub fn cancelled(operation: &str) -> Self {
        Self::new(ErrorKind::Network, format!("{} was cancelled", operation))
    }

    pub fn deadline_exceeded(operation: &str, limit: Duration) -> Self {
        Self::new(
            ErrorKind::Network,
            format!("{} timed out after {}ms", operation, limit.as_millis()),
        )
        .with_suggestion("Check backend reachability or raise the request timeout.")
    }

    // ---- validation ----

    pub fn base_url_missing(service: &str, env: &str) -> Self {
        Self::new(
            ErrorKind::Validation,
            format!(
                "Could not resolve base_url for service '{}' in environment '{}'",
                service, env
            ),
        )
        .with_suggestion("Ensure the service has a base_url configured in Consul or the service config.")
    }

    pub fn invalid_method(method: &str) -> Self {
        Self::new(ErrorKind::Validation, format!("Invalid HTTP method: {}", method))
            .with_suggestion("Valid methods are: GET, POST, PUT, PATCH, DELETE, HEAD, OPTIONS")
    }

    pub fn missing_required_flag(flag: &str) -> Self {
        Self::new(ErrorKind::Validation, format!("Required flag missing: --{}", flag))
            .with_suggestion("See 'sreq run --help' for usage information.")
    }
}

impl fmt::Display for SreqError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)?;
        if let Some(cause) = &self.cause {
            write!(f, "\n  Cause: {}", cause)?;
        }
        if let Some(suggestion) = &self.suggestion {
            write!(f, "\n  Suggestion: {}", suggestion)?;
        }
        Ok(())
    }
}

impl StdError for SreqError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.cause.as_deref().map(|e| e as &(dyn StdError + 'static))
    }
}
