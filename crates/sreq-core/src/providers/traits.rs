//! Provider trait definition

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;

use crate::errors::SreqResult;
use crate::types::ResolveContext;

/// A secret backend that resolves keys to values
///
/// Each backend (Consul KV, AWS Secrets Manager, ...) implements this trait.
/// The target environment, deadline and cancellation travel in the
/// [`ResolveContext`] passed to every call.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Provider name (e.g., "consul", "aws_secrets")
    fn name(&self) -> &str;

    /// Retrieve a value by key
    async fn get(&self, key: &str, ctx: &ResolveContext) -> SreqResult<String>;

    /// Retrieve several values
    ///
    /// Keys are fetched in order and the first failure is returned as-is;
    /// no partial map is ever produced. Callers that want partial results
    /// should call [`get`](Provider::get) per key.
    async fn get_multiple(
        &self,
        keys: &[&str],
        ctx: &ResolveContext,
    ) -> SreqResult<HashMap<String, String>> {
        let mut values = HashMap::with_capacity(keys.len());
        for key in keys {
            let value = self.get(key, ctx).await?;
            values.insert(key.to_string(), value);
        }
        Ok(values)
    }

    /// Check the backend is reachable
    async fn health(&self, ctx: &ResolveContext) -> SreqResult<()>;

    /// Configured addresses for display (`"default"` plus per-environment)
    fn addresses(&self) -> BTreeMap<String, String> {
        BTreeMap::new()
    }

    /// Key template registered under a logical name (e.g. "base_url")
    fn path_template(&self, _name: &str) -> Option<&str> {
        None
    }
}
