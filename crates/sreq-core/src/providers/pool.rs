//! Lazily-populated backend client pool
//!
//! One client per resolved address, created on first use and kept for the
//! life of the owning provider.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::errors::SreqResult;

/// Builds a backend client bound to an address
pub type ClientFactory<C> = Box<dyn Fn(&str) -> SreqResult<C> + Send + Sync>;

/// Thread-safe cache of backend clients keyed by address
///
/// Lookups take a shared lock. A miss takes the exclusive lock and checks
/// again before constructing, so callers racing on a new address end up
/// sharing the one client that was built. Failed constructions are not
/// cached; the next call for that address tries again.
pub struct ConnectionPool<C> {
    factory: ClientFactory<C>,
    clients: RwLock<HashMap<String, Arc<C>>>,
}

impl<C> ConnectionPool<C> {
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn(&str) -> SreqResult<C> + Send + Sync + 'static,
    {
        Self {
            factory: Box::new(factory),
            clients: RwLock::new(HashMap::new()),
        }
    }

    /// Get the client for `address`, creating it on first use
    pub fn client_for(&self, address: &str) -> SreqResult<Arc<C>> {
        if let Some(client) = self.clients.read().get(address) {
            return Ok(Arc::clone(client));
        }

        let mut clients = self.clients.write();

        // Another caller may have created it while we waited for the lock
        if let Some(client) = clients.get(address) {
            return Ok(Arc::clone(client));
        }

        let client = Arc::new((self.factory)(address)?);
        clients.insert(address.to_string(), Arc::clone(&client));
        Ok(client)
    }

    pub fn contains(&self, address: &str) -> bool {
        self.clients.read().contains_key(address)
    }

    pub fn len(&self) -> usize {
        self.clients.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<C> std::fmt::Debug for ConnectionPool<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let clients = self.clients.read();
        let mut addresses: Vec<&String> = clients.keys().collect();
        addresses.sort();
        f.debug_struct("ConnectionPool")
            .field("addresses", &addresses)
            .finish()
    }
}
