//! sreq configuration file (YAML)
//!
//! Lives at `~/.sreq/config.yaml` by default.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::provider::ProviderConfig;
use crate::errors::{SreqError, SreqResult};

/// A service the CLI knows how to call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default)]
    pub name: String,
    /// Consul key (or key prefix) for this service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consul_key: Option<String>,
    /// AWS Secrets Manager prefix for this service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aws_prefix: Option<String>,
}

/// Configuration file structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SreqConfig {
    /// Configured providers, keyed by name
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,

    /// Known environments (dev, staging, prod, ...)
    #[serde(default)]
    pub environments: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_env: Option<String>,

    #[serde(default)]
    pub services: HashMap<String, ServiceConfig>,
}

impl SreqConfig {
    /// Default config location (`~/.sreq/config.yaml`)
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".sreq")
            .join("config.yaml")
    }

    /// Load and parse a config file
    pub fn load(path: impl AsRef<Path>) -> SreqResult<Self> {
        let path = path.as_ref();
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(SreqError::config_not_found(path.display()));
            }
            Err(e) => return Err(SreqError::config_parse_error(path.display(), e)),
        };
        Self::from_yaml(&content).map_err(|e| SreqError::config_parse_error(path.display(), e))
    }

    /// Parse config from a YAML string
    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }

    /// Serialize to YAML
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }

    /// Look up a provider by name
    pub fn provider(&self, name: &str) -> SreqResult<&ProviderConfig> {
        self.providers
            .get(name)
            .ok_or_else(|| SreqError::provider_not_configured(name))
    }

    /// Look up a service by name
    pub fn service(&self, name: &str) -> SreqResult<&ServiceConfig> {
        self.services
            .get(name)
            .ok_or_else(|| SreqError::service_not_found(name))
    }

    /// Environment to use when the caller did not name one
    pub fn effective_env<'a>(&'a self, requested: Option<&'a str>) -> &'a str {
        requested
            .filter(|env| !env.is_empty())
            .or(self.default_env.as_deref())
            .unwrap_or("")
    }

    /// Reject environments missing from a non-empty `environments` list
    pub fn check_environment(&self, env: &str) -> SreqResult<()> {
        if self.environments.is_empty() || self.environments.iter().any(|e| e == env) {
            Ok(())
        } else {
            Err(SreqError::context_not_found(env))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = r#"
providers:
  consul:
    type: consul
    address: consul.internal:8500
    env_addresses:
      prod: consul.prod.internal:8500
    paths:
      base_url: services/{service}/{env}/base_url
      api_key: services/{service}/{env}/api_key
  aws:
    type: aws_secrets
    region: eu-west-1
environments: [dev, staging, prod]
default_env: dev
services:
  auth:
    name: auth
    consul_key: auth-service
"#;

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let config = SreqConfig::load(file.path()).unwrap();
        assert_eq!(config.providers.len(), 2);
        assert_eq!(config.provider("aws").unwrap().region.as_deref(), Some("eu-west-1"));
        assert_eq!(config.service("auth").unwrap().consul_key.as_deref(), Some("auth-service"));
        assert_eq!(config.default_env.as_deref(), Some("dev"));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = SreqConfig::load(dir.path().join("missing.yaml")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
        assert!(err.message().starts_with("Configuration file not found"));
        assert!(err.suggestion().unwrap().contains("sreq init"));
    }

    #[test]
    fn test_malformed_yaml() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"providers: [this is: not valid").unwrap();

        let err = SreqConfig::load(file.path()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
        assert!(err.message().starts_with("Failed to parse configuration file"));
        assert!(err.cause().is_some());
    }

    #[test]
    fn test_unknown_lookups() {
        let config = SreqConfig::from_yaml(SAMPLE).unwrap();

        let err = config.provider("vault").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Provider);
        assert_eq!(err.message(), "Provider 'vault' is not configured");

        let err = config.service("billing").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_environment_checks() {
        let config = SreqConfig::from_yaml(SAMPLE).unwrap();
        assert!(config.check_environment("prod").is_ok());
        let err = config.check_environment("qa").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        // An empty list accepts anything
        assert!(SreqConfig::default().check_environment("qa").is_ok());
    }

    #[test]
    fn test_effective_env() {
        let config = SreqConfig::from_yaml(SAMPLE).unwrap();
        assert_eq!(config.effective_env(Some("prod")), "prod");
        assert_eq!(config.effective_env(Some("")), "dev");
        assert_eq!(config.effective_env(None), "dev");
        assert_eq!(SreqConfig::default().effective_env(None), "");
    }

    #[test]
    fn test_yaml_roundtrip_keeps_providers() {
        let config = SreqConfig::from_yaml(SAMPLE).unwrap();
        let reparsed = SreqConfig::from_yaml(&config.to_yaml().unwrap()).unwrap();
        assert_eq!(config, reparsed);
    }

    #[test]
    fn test_default_path() {
        let path = SreqConfig::default_path();
        assert!(path.ends_with(".sreq/config.yaml"));
    }
}
