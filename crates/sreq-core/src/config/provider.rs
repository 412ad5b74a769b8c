//! Per-provider configuration as it appears in ~/.sreq/config.yaml

use std::collections::HashMap;
use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default per-request timeout for backend calls
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Configuration for one secret provider
///
/// ```yaml
/// providers:
///   consul:
///     type: consul
///     address: consul.internal:8500
///     env_addresses:
///       prod: consul.prod.internal:8500
///     token: ${CONSUL_HTTP_TOKEN}
///     datacenter: dc1
///     paths:
///       base_url: services/{service}/{env}/base_url
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Backend type discriminator (`consul`, `aws_secrets`)
    #[serde(rename = "type")]
    pub provider_type: String,

    /// Default backend address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    /// Per-environment address overrides (env name -> address)
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub env_addresses: HashMap<String, String>,

    /// Literal token or `${ENV_VAR}` reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datacenter: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,

    /// Logical key name -> key template
    #[serde(default)]
    pub paths: HashMap<String, String>,

    /// Per-request backend timeout in milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

impl ProviderConfig {
    /// Create a config for the given backend type
    pub fn new(provider_type: impl Into<String>) -> Self {
        Self {
            provider_type: provider_type.into(),
            ..Default::default()
        }
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn with_env_address(mut self, env: impl Into<String>, address: impl Into<String>) -> Self {
        self.env_addresses.insert(env.into(), address.into());
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_datacenter(mut self, datacenter: impl Into<String>) -> Self {
        self.datacenter = Some(datacenter.into());
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_path(mut self, name: impl Into<String>, template: impl Into<String>) -> Self {
        self.paths.insert(name.into(), template.into());
        self
    }

    /// Backend request timeout, falling back to [`DEFAULT_TIMEOUT_MS`]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms.unwrap_or(DEFAULT_TIMEOUT_MS))
    }
}

/// Resolve a `${VAR_NAME}` token reference against the process environment
///
/// Anything not of that exact shape is returned unchanged. An unset variable
/// resolves to the empty string.
pub fn resolve_token_reference(raw: &str) -> String {
    match raw.strip_prefix("${").and_then(|rest| rest.strip_suffix('}')) {
        Some(var) => env::var(var).unwrap_or_default(),
        None => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_token_unchanged() {
        assert_eq!(resolve_token_reference("s3cr3t"), "s3cr3t");
        assert_eq!(resolve_token_reference("${unterminated"), "${unterminated");
        assert_eq!(resolve_token_reference(""), "");
    }

    #[test]
    fn test_token_reference_reads_env() {
        env::set_var("SREQ_TEST_TOKEN_REF_1", "from-env");
        assert_eq!(resolve_token_reference("${SREQ_TEST_TOKEN_REF_1}"), "from-env");
        env::remove_var("SREQ_TEST_TOKEN_REF_1");
    }

    #[test]
    fn test_unset_token_reference_is_empty() {
        assert_eq!(resolve_token_reference("${SREQ_TEST_TOKEN_REF_UNSET_XYZ}"), "");
    }

    #[test]
    fn test_timeout_default() {
        let config = ProviderConfig::new("consul");
        assert_eq!(config.timeout(), Duration::from_millis(DEFAULT_TIMEOUT_MS));

        let config = ProviderConfig {
            timeout_ms: Some(250),
            ..ProviderConfig::new("consul")
        };
        assert_eq!(config.timeout(), Duration::from_millis(250));
    }

    #[test]
    fn test_deserialize_yaml() {
        let yaml = r#"
type: consul
address: consul.internal:8500
env_addresses:
  prod: consul.prod.internal:8500
token: ${CONSUL_HTTP_TOKEN}
datacenter: dc1
paths:
  base_url: services/{service}/{env}/base_url
"#;
        let config: ProviderConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.provider_type, "consul");
        assert_eq!(config.address.as_deref(), Some("consul.internal:8500"));
        assert_eq!(
            config.env_addresses.get("prod").map(String::as_str),
            Some("consul.prod.internal:8500")
        );
        assert_eq!(config.token.as_deref(), Some("${CONSUL_HTTP_TOKEN}"));
        assert_eq!(config.datacenter.as_deref(), Some("dc1"));
        assert_eq!(config.paths.len(), 1);
    }
}
