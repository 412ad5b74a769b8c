//! Credential resolution for a service in an environment
//!
//! Looks up the provider's `base_url`, `username`, `password` and `api_key`
//! path templates, binds `{service}` and `{env}`, and fetches each key.

use std::sync::Arc;

use crate::errors::{SreqError, SreqResult};
use crate::logging::{NoOpLogger, SharedLogger};
use crate::providers::{resolve_path_simple, Provider};
use crate::types::{ResolveContext, ResolvedCredentials};

/// Path template name of the required base URL
pub const BASE_URL: &str = "base_url";
pub const USERNAME: &str = "username";
pub const PASSWORD: &str = "password";
pub const API_KEY: &str = "api_key";

/// Builds [`ResolvedCredentials`] from a single provider
pub struct CredentialResolver {
    provider: Arc<dyn Provider>,
    logger: SharedLogger,
}

impl CredentialResolver {
    pub fn new(provider: Arc<dyn Provider>) -> Self {
        Self {
            provider,
            logger: Arc::new(NoOpLogger::new()),
        }
    }

    pub fn with_logger(mut self, logger: SharedLogger) -> Self {
        self.logger = logger;
        self
    }

    pub fn provider(&self) -> &Arc<dyn Provider> {
        &self.provider
    }

    /// Resolve credentials for `service` in the context's environment
    ///
    /// The base URL is required. Username, password and API key are filled
    /// in only when the provider has a template for them and the key exists.
    pub async fn resolve(&self, service: &str, ctx: &ResolveContext) -> SreqResult<ResolvedCredentials> {
        let env = ctx.environment();
        self.logger.debug(&format!(
            "resolving credentials for '{}' (env: '{}') via {}",
            service,
            env,
            self.provider.name()
        ));

        let base_url = self
            .lookup(BASE_URL, service, ctx)
            .await?
            .ok_or_else(|| SreqError::base_url_missing(service, env))?;

        let mut credentials = ResolvedCredentials::new(base_url);
        credentials.username = self.lookup(USERNAME, service, ctx).await?;
        credentials.password = self.lookup(PASSWORD, service, ctx).await?;
        credentials.api_key = self.lookup(API_KEY, service, ctx).await?;
        Ok(credentials)
    }

    /// `None` when no template is configured or the key is absent
    async fn lookup(&self, name: &str, service: &str, ctx: &ResolveContext) -> SreqResult<Option<String>> {
        let env = ctx.environment();
        let Some(template) = self.provider.path_template(name) else {
            return Ok(None);
        };
        let key = resolve_path_simple(template, service, env);

        match self.provider.get(&key, ctx).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.is_not_found() => {
                self.logger.debug(&format!("'{}' not set for '{}' ({})", name, service, key));
                Ok(None)
            }
            Err(e) => Err(SreqError::credential_resolution_failed(service, env, e)),
        }
    }
}

impl std::fmt::Debug for CredentialResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialResolver")
            .field("provider", &self.provider.name())
            .finish()
    }
}
