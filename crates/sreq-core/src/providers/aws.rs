//! AWS Secrets Manager provider
//!
//! Configuration and routing are in place; secret lookups are not wired to
//! the AWS SDK yet and fail with a provider error naming the key and region.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;

use super::traits::Provider;
use crate::config::ProviderConfig;
use crate::errors::{SreqError, SreqResult};
use crate::logging::{NoOpLogger, SharedLogger};
use crate::types::ResolveContext;

pub const DEFAULT_REGION: &str = "us-east-1";

#[derive(Debug, Clone)]
pub struct AwsConfig {
    pub region: String,
    /// Named profile from `~/.aws/credentials`
    pub profile: Option<String>,
    /// Logical key name -> secret id template
    pub paths: HashMap<String, String>,
}

impl Default for AwsConfig {
    fn default() -> Self {
        Self {
            region: DEFAULT_REGION.to_string(),
            profile: None,
            paths: HashMap::new(),
        }
    }
}

impl AwsConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }

    pub fn with_path(mut self, name: impl Into<String>, template: impl Into<String>) -> Self {
        self.paths.insert(name.into(), template.into());
        self
    }
}

impl From<&ProviderConfig> for AwsConfig {
    fn from(config: &ProviderConfig) -> Self {
        Self {
            region: config
                .region
                .clone()
                .filter(|r| !r.is_empty())
                .unwrap_or_else(|| DEFAULT_REGION.to_string()),
            profile: config.profile.clone().filter(|p| !p.is_empty()),
            paths: config.paths.clone(),
        }
    }
}

#[derive(Clone)]
pub struct AwsSecretsProvider {
    config: AwsConfig,
    logger: SharedLogger,
}

impl AwsSecretsProvider {
    pub fn new(config: AwsConfig) -> Self {
        Self {
            config,
            logger: Arc::new(NoOpLogger::new()),
        }
    }

    pub fn from_config(config: &ProviderConfig) -> Self {
        Self::new(AwsConfig::from(config))
    }

    pub fn with_logger(mut self, logger: SharedLogger) -> Self {
        self.logger = logger;
        self
    }

    pub fn region(&self) -> &str {
        &self.config.region
    }

    pub fn profile(&self) -> Option<&str> {
        self.config.profile.as_deref()
    }
}

#[async_trait]
impl Provider for AwsSecretsProvider {
    fn name(&self) -> &str {
        "aws_secrets"
    }

    async fn get(&self, key: &str, ctx: &ResolveContext) -> SreqResult<String> {
        if ctx.is_cancelled() {
            return Err(SreqError::cancelled("aws secrets get"));
        }
        self.logger.debug(&format!(
            "aws secrets get '{}' in {} (env: '{}')",
            key,
            self.config.region,
            ctx.environment()
        ));
        Err(SreqError::aws_not_available(&self.config.region, key))
    }

    async fn health(&self, _ctx: &ResolveContext) -> SreqResult<()> {
        Ok(())
    }

    fn addresses(&self) -> BTreeMap<String, String> {
        BTreeMap::from([("default".to_string(), format!("region {}", self.config.region))])
    }

    fn path_template(&self, name: &str) -> Option<&str> {
        self.config.paths.get(name).map(String::as_str)
    }
}

impl std::fmt::Debug for AwsSecretsProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AwsSecretsProvider")
            .field("config", &self.config)
            .finish()
    }
}
