//! Resolved credential bundle handed to the request layer

use std::collections::HashMap;

/// Connection parameters for one service in one environment
///
/// Assembled by [`CredentialResolver`](crate::resolver::CredentialResolver)
/// from individual provider lookups. Optional fields stay `None` when the
/// provider has no path template for them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedCredentials {
    /// Base URL requests are issued against
    pub base_url: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub api_key: Option<String>,
    /// Extra headers to attach to every request
    pub headers: HashMap<String, String>,
}

impl ResolvedCredentials {
    /// Create credentials with only a base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Whether both halves of basic auth are present
    pub fn has_basic_auth(&self) -> bool {
        self.username.is_some() && self.password.is_some()
    }

    /// Add a header
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_auth_requires_both_parts() {
        let mut creds = ResolvedCredentials::new("https://auth.dev.internal");
        assert!(!creds.has_basic_auth());

        creds.username = Some("svc".to_string());
        assert!(!creds.has_basic_auth());

        creds.password = Some("hunter2".to_string());
        assert!(creds.has_basic_auth());
    }

    #[test]
    fn test_with_header() {
        let creds = ResolvedCredentials::new("https://x").with_header("X-Tenant", "acme");
        assert_eq!(creds.headers.get("X-Tenant"), Some(&"acme".to_string()));
    }
}
