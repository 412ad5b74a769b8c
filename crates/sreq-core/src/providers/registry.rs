//! Provider type registry
//!
//! Maps the `type` field of a provider config entry to a factory.

use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;

use super::aws::AwsSecretsProvider;
use super::consul::ConsulProvider;
use super::traits::Provider;
use crate::config::ProviderConfig;
use crate::errors::{SreqError, SreqResult};

/// Factory function type for creating providers from their config entry
pub type ProviderFactory = Box<dyn Fn(&ProviderConfig) -> SreqResult<Arc<dyn Provider>> + Send + Sync>;

/// A registered provider type
pub struct ProviderDefinition {
    pub name: String,
    pub description: String,
    pub factory: ProviderFactory,
}

impl std::fmt::Debug for ProviderDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderDefinition")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish()
    }
}

static REGISTRY: Lazy<RwLock<HashMap<String, ProviderDefinition>>> = Lazy::new(|| {
    let mut map = HashMap::new();

    map.insert(
        "consul".to_string(),
        ProviderDefinition {
            name: "consul".to_string(),
            description: "Consul KV with per-environment agent routing".to_string(),
            factory: Box::new(consul_factory),
        },
    );

    map.insert(
        "aws_secrets".to_string(),
        ProviderDefinition {
            name: "aws_secrets".to_string(),
            description: "AWS Secrets Manager".to_string(),
            factory: Box::new(aws_factory),
        },
    );

    RwLock::new(map)
});

fn consul_factory(config: &ProviderConfig) -> SreqResult<Arc<dyn Provider>> {
    let provider: Arc<dyn Provider> = Arc::new(ConsulProvider::from_config(config)?);
    Ok(provider)
}

fn aws_factory(config: &ProviderConfig) -> SreqResult<Arc<dyn Provider>> {
    let provider: Arc<dyn Provider> = Arc::new(AwsSecretsProvider::from_config(config));
    Ok(provider)
}

/// Register (or replace) a provider type
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use sreq_core::config::ProviderConfig;
/// use sreq_core::providers::{register_provider_type, AwsSecretsProvider, Provider};
///
/// register_provider_type(
///     "aws_mirror",
///     "AWS Secrets Manager under another name",
///     Box::new(|config: &ProviderConfig| {
///         let provider: Arc<dyn Provider> = Arc::new(AwsSecretsProvider::from_config(config));
///         Ok(provider)
///     }),
/// );
/// ```
pub fn register_provider_type(name: &str, description: &str, factory: ProviderFactory) {
    REGISTRY.write().insert(
        name.to_string(),
        ProviderDefinition {
            name: name.to_string(),
            description: description.to_string(),
            factory,
        },
    );
}

/// Build a provider from its config entry, dispatching on `config.provider_type`
pub fn create_provider(config: &ProviderConfig) -> SreqResult<Arc<dyn Provider>> {
    let registry = REGISTRY.read();
    let definition = registry
        .get(&config.provider_type)
        .ok_or_else(|| SreqError::provider_not_configured(&config.provider_type))?;
    (definition.factory)(config)
}

/// List registered provider types as (name, description), sorted by name
pub fn list_provider_types() -> Vec<(String, String)> {
    let registry = REGISTRY.read();
    let mut types: Vec<_> = registry
        .values()
        .map(|def| (def.name.clone(), def.description.clone()))
        .collect();
    types.sort();
    types
}

pub fn has_provider_type(name: &str) -> bool {
    REGISTRY.read().contains_key(name)
}

/// Unregister a provider type (mainly for testing)
pub fn unregister_provider_type(name: &str) -> bool {
    REGISTRY.write().remove(name).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;

    #[test]
    fn test_builtin_types_registered() {
        assert!(has_provider_type("consul"));
        assert!(has_provider_type("aws_secrets"));

        let names: Vec<_> = list_provider_types().into_iter().map(|(n, _)| n).collect();
        assert!(names.contains(&"consul".to_string()));
        assert!(names.contains(&"aws_secrets".to_string()));
    }

    #[test]
    fn test_create_consul() {
        let config = ProviderConfig::new("consul").with_address("consul.internal:8500");
        let provider = create_provider(&config).unwrap();
        assert_eq!(provider.name(), "consul");
        assert_eq!(
            provider.addresses().get("default").map(String::as_str),
            Some("http://consul.internal:8500")
        );
    }

    #[test]
    fn test_create_consul_without_address_fails() {
        let Err(err) = create_provider(&ProviderConfig::new("consul")) else {
            panic!("consul without an address should not build");
        };
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn test_create_aws() {
        let provider = create_provider(&ProviderConfig::new("aws_secrets")).unwrap();
        assert_eq!(provider.name(), "aws_secrets");
    }

    #[test]
    fn test_unknown_type() {
        let Err(err) = create_provider(&ProviderConfig::new("vault")) else {
            panic!("unknown provider type should not build");
        };
        assert_eq!(err.kind(), ErrorKind::Provider);
        assert_eq!(err.message(), "Provider 'vault' is not configured");
    }

    #[test]
    fn test_register_custom_type() {
        register_provider_type(
            "test_custom_provider",
            "A test provider",
            Box::new(|config: &ProviderConfig| aws_factory(config)),
        );
        assert!(has_provider_type("test_custom_provider"));

        let provider = create_provider(&ProviderConfig::new("test_custom_provider")).unwrap();
        assert_eq!(provider.name(), "aws_secrets");

        assert!(unregister_provider_type("test_custom_provider"));
        assert!(!has_provider_type("test_custom_provider"));
        assert!(!unregister_provider_type("test_custom_provider"));
    }
}
