//! Consul KV provider
//!
//! Routes each lookup to a Consul agent chosen by environment, reusing one
//! pooled HTTP client per agent address.
//!
//! ```rust,ignore
//! use sreq_core::providers::{ConsulConfig, ConsulProvider, Provider};
//! use sreq_core::ResolveContext;
//!
//! let provider = ConsulProvider::new(
//!     ConsulConfig::new()
//!         .with_address("consul.internal:8500")
//!         .with_env_address("prod", "consul.prod.internal:8500")
//!         .with_token("${CONSUL_HTTP_TOKEN}"),
//! )?;
//!
//! let base_url = provider.get("services/auth/prod/base_url", &ResolveContext::for_env("prod")).await?;
//! ```

mod client;

pub use client::{normalize_address, ClientError, ClientSettings, ConsulClient};

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use super::pool::ConnectionPool;
use super::router::AddressRouter;
use super::template::resolve_path;
use super::traits::Provider;
use crate::config::{resolve_token_reference, ProviderConfig};
use crate::errors::{SreqError, SreqResult};
use crate::logging::{NoOpLogger, SharedLogger};
use crate::types::ResolveContext;

/// Consul provider configuration
#[derive(Debug, Clone, Default)]
pub struct ConsulConfig {
    /// Default agent address
    pub address: String,
    /// Per-environment agent addresses
    pub env_addresses: HashMap<String, String>,
    /// Literal token or `${ENV_VAR}` reference
    pub token: String,
    pub datacenter: String,
    /// Logical key name -> key template
    pub paths: HashMap<String, String>,
    /// Per-request timeout enforced by the HTTP client
    pub timeout: Option<Duration>,
}

impl ConsulConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    pub fn with_env_address(mut self, env: impl Into<String>, address: impl Into<String>) -> Self {
        self.env_addresses.insert(env.into(), address.into());
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = token.into();
        self
    }

    pub fn with_datacenter(mut self, datacenter: impl Into<String>) -> Self {
        self.datacenter = datacenter.into();
        self
    }

    pub fn with_path(mut self, name: impl Into<String>, template: impl Into<String>) -> Self {
        self.paths.insert(name.into(), template.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

impl From<&ProviderConfig> for ConsulConfig {
    fn from(config: &ProviderConfig) -> Self {
        Self {
            address: config.address.clone().unwrap_or_default(),
            env_addresses: config.env_addresses.clone(),
            token: config.token.clone().unwrap_or_default(),
            datacenter: config.datacenter.clone().unwrap_or_default(),
            paths: config.paths.clone(),
            timeout: Some(config.timeout()),
        }
    }
}

/// Consul KV implementation of [`Provider`]
pub struct ConsulProvider {
    router: AddressRouter,
    token: String,
    datacenter: String,
    paths: HashMap<String, String>,
    pool: ConnectionPool<ConsulClient>,
    logger: SharedLogger,
}

impl ConsulProvider {
    /// Build a provider; fails when no address is configured at all
    ///
    /// A `${VAR}` token is read from the environment here, once.
    pub fn new(config: ConsulConfig) -> SreqResult<Self> {
        let router = AddressRouter::new(config.address, config.env_addresses);
        if router.is_empty() {
            return Err(SreqError::consul_address_required());
        }
        let router = router.map_addresses(normalize_address);

        let token = resolve_token_reference(&config.token);
        let settings = ClientSettings {
            token: Some(token.clone()).filter(|t| !t.is_empty()),
            datacenter: Some(config.datacenter.clone()).filter(|dc| !dc.is_empty()),
            timeout: config.timeout,
        };
        let pool = ConnectionPool::new(move |address: &str| {
            ConsulClient::new(address, &settings).map_err(|e| SreqError::consul_client_failed(address, e))
        });

        Ok(Self {
            router,
            token,
            datacenter: config.datacenter,
            paths: config.paths,
            pool,
            logger: Arc::new(NoOpLogger::new()),
        })
    }

    /// Build from a `type: consul` entry of the config file
    pub fn from_config(config: &ProviderConfig) -> SreqResult<Self> {
        Self::new(ConsulConfig::from(config))
    }

    /// Replace the default silent logger
    ///
    /// ```
    /// use std::sync::Arc;
    /// use sreq_core::providers::{ConsulConfig, ConsulProvider};
    /// use sreq_core::ConsoleLogger;
    ///
    /// let provider = ConsulProvider::new(ConsulConfig::new().with_address("consul.internal:8500"))
    ///     .unwrap()
    ///     .with_logger(Arc::new(ConsoleLogger::new().with_debug(true)));
    /// ```
    pub fn with_logger(mut self, logger: SharedLogger) -> Self {
        self.logger = logger;
        self
    }

    pub fn datacenter(&self) -> Option<&str> {
        Some(self.datacenter.as_str()).filter(|dc| !dc.is_empty())
    }

    pub fn has_token(&self) -> bool {
        !self.token.is_empty()
    }

    pub fn router(&self) -> &AddressRouter {
        &self.router
    }

    fn client_for_env(&self, env: &str) -> SreqResult<Arc<ConsulClient>> {
        let address = self.router.address_for(env);
        if address.is_empty() {
            return Err(SreqError::consul_address_required());
        }
        self.pool.client_for(address)
    }

    /// Resolve `template` with `vars`, then [`get`](Provider::get)
    pub async fn get_with_template(
        &self,
        template: &str,
        vars: &HashMap<String, String>,
        ctx: &ResolveContext,
    ) -> SreqResult<String> {
        let key = resolve_path(template, vars);
        self.get(&key, ctx).await
    }

    /// Resolve the template registered under `name`, then fetch it
    pub async fn get_path(
        &self,
        name: &str,
        vars: &HashMap<String, String>,
        ctx: &ResolveContext,
    ) -> SreqResult<String> {
        let template = self
            .paths
            .get(name)
            .ok_or_else(|| SreqError::path_not_configured(self.name(), name))?;
        self.get_with_template(template, vars, ctx).await
    }

    /// Check only the agent routed for `env`
    pub async fn health_for_env(&self, env: &str, ctx: &ResolveContext) -> SreqResult<()> {
        let client = self.client_for_env(env)?;
        ctx.run("consul health check", async {
            client
                .leader()
                .await
                .map(|_| ())
                .map_err(|e| SreqError::consul_health_failed(client.address(), Some(env), e))
        })
        .await
    }

    /// List every key under `prefix` on the agent routed for the context's environment
    pub async fn list_keys(&self, prefix: &str, ctx: &ResolveContext) -> SreqResult<Vec<String>> {
        let client = self.client_for_env(ctx.environment())?;
        ctx.run("consul key listing", async {
            client.keys(prefix).await.map_err(|e| {
                if e.is_permission_denied() {
                    SreqError::consul_auth_failed(client.address(), e)
                } else {
                    SreqError::consul_list_failed(prefix, e)
                }
            })
        })
        .await
    }
}

#[async_trait]
impl Provider for ConsulProvider {
    fn name(&self) -> &str {
        "consul"
    }

    async fn get(&self, key: &str, ctx: &ResolveContext) -> SreqResult<String> {
        let client = self.client_for_env(ctx.environment())?;
        self.logger.debug(&format!(
            "consul get '{}' via {} (env: '{}')",
            key,
            client.address(),
            ctx.environment()
        ));

        ctx.run("consul get", async {
            match client.get(key).await {
                Ok(Some(value)) => Ok(value),
                Ok(None) => Err(SreqError::consul_key_not_found(key)),
                Err(e) if e.is_permission_denied() => {
                    Err(SreqError::consul_auth_failed(client.address(), e))
                }
                Err(e) => Err(SreqError::consul_get_failed(key, e)),
            }
        })
        .await
    }

    /// Checks every configured agent; a failing agent does not stop the
    /// others, and the last failure seen is returned
    async fn health(&self, ctx: &ResolveContext) -> SreqResult<()> {
        let mut last_err = None;

        for address in self.router.all_addresses() {
            let client = match self.pool.client_for(&address) {
                Ok(client) => client,
                Err(e) => {
                    self.logger.warn(&format!("consul client for {} unavailable: {}", address, e.message()));
                    last_err = Some(e);
                    continue;
                }
            };

            let result = ctx
                .run("consul health check", async {
                    client
                        .leader()
                        .await
                        .map(|_| ())
                        .map_err(|e| SreqError::consul_health_failed(&address, None, e))
                })
                .await;

            match result {
                Ok(()) => self.logger.debug(&format!("consul at {} is healthy", address)),
                Err(e) => {
                    self.logger.warn(e.message());
                    last_err = Some(e);
                }
            }
        }

        match last_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn addresses(&self) -> BTreeMap<String, String> {
        self.router.addresses()
    }

    fn path_template(&self, name: &str) -> Option<&str> {
        self.paths.get(name).map(String::as_str)
    }
}

impl std::fmt::Debug for ConsulProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsulProvider")
            .field("router", &self.router)
            .field("has_token", &self.has_token())
            .field("datacenter", &self.datacenter)
            .field("pool", &self.pool)
            .finish()
    }
}
