//! Environment to backend address routing

use std::collections::{BTreeMap, HashMap};

/// Maps an environment name to a backend address
///
/// Lookup order is an exact match in the per-environment overrides, then the
/// default address. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressRouter {
    default_address: String,
    env_addresses: BTreeMap<String, String>,
}

impl AddressRouter {
    pub fn new(default_address: impl Into<String>, env_addresses: HashMap<String, String>) -> Self {
        Self {
            default_address: default_address.into(),
            env_addresses: env_addresses.into_iter().collect(),
        }
    }

    /// Address for `env`; empty when nothing is configured
    pub fn address_for(&self, env: &str) -> &str {
        self.env_addresses
            .get(env)
            .map(String::as_str)
            .unwrap_or(&self.default_address)
    }

    pub fn default_address(&self) -> &str {
        &self.default_address
    }

    /// True when neither a default nor any override is configured
    pub fn is_empty(&self) -> bool {
        self.default_address.is_empty() && self.env_addresses.is_empty()
    }

    /// Every distinct address, default first, then overrides by environment name
    pub fn all_addresses(&self) -> Vec<String> {
        let mut addresses: Vec<String> = Vec::with_capacity(self.env_addresses.len() + 1);
        let candidates = std::iter::once(&self.default_address).chain(self.env_addresses.values());
        for address in candidates {
            if !address.is_empty() && !addresses.contains(address) {
                addresses.push(address.clone());
            }
        }
        addresses
    }

    /// Display view: `"default"` plus one entry per environment override
    pub fn addresses(&self) -> BTreeMap<String, String> {
        let mut view = self.env_addresses.clone();
        if !self.default_address.is_empty() {
            view.insert("default".to_string(), self.default_address.clone());
        }
        view
    }

    /// Apply `f` to every address (default and overrides)
    pub(crate) fn map_addresses(self, f: impl Fn(&str) -> String) -> Self {
        Self {
            default_address: if self.default_address.is_empty() {
                String::new()
            } else {
                f(&self.default_address)
            },
            env_addresses: self
                .env_addresses
                .into_iter()
                .map(|(env, address)| (env, f(&address)))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn router() -> AddressRouter {
        AddressRouter::new("A", HashMap::from([("dev".to_string(), "B".to_string())]))
    }

    #[test]
    fn test_override_then_default() {
        let router = router();
        assert_eq!(router.address_for("dev"), "B");
        assert_eq!(router.address_for("prod"), "A");
        assert_eq!(router.address_for(""), "A");
    }

    #[test]
    fn test_nothing_configured() {
        let router = AddressRouter::new("", HashMap::new());
        assert!(router.is_empty());
        assert_eq!(router.address_for("dev"), "");
        assert!(router.all_addresses().is_empty());
    }

    #[test]
    fn test_overrides_only() {
        let router = AddressRouter::new("", HashMap::from([("prod".to_string(), "P".to_string())]));
        assert!(!router.is_empty());
        assert_eq!(router.address_for("prod"), "P");
        assert_eq!(router.address_for("dev"), "");
    }

    #[test]
    fn test_all_addresses_deduplicated() {
        let router = AddressRouter::new(
            "A",
            HashMap::from([
                ("staging".to_string(), "B".to_string()),
                ("dev".to_string(), "A".to_string()),
                ("prod".to_string(), "C".to_string()),
            ]),
        );
        // default first, then overrides ordered by env name (dev, prod, staging)
        assert_eq!(router.all_addresses(), vec!["A", "C", "B"]);
    }

    #[test]
    fn test_display_view() {
        let view = router().addresses();
        assert_eq!(view.len(), 2);
        assert_eq!(view.get("default").map(String::as_str), Some("A"));
        assert_eq!(view.get("dev").map(String::as_str), Some("B"));

        let no_default = AddressRouter::new("", HashMap::from([("dev".to_string(), "B".to_string())]));
        assert!(!no_default.addresses().contains_key("default"));
    }

    #[test]
    fn test_map_addresses() {
        let mapped = router().map_addresses(|a| format!("http://{}", a.to_lowercase()));
        assert_eq!(mapped.address_for("dev"), "http://b");
        assert_eq!(mapped.default_address(), "http://a");

        let empty_default = AddressRouter::new("", HashMap::new()).map_addresses(|a| format!("x{}", a));
        assert_eq!(empty_default.default_address(), "");
    }
}
