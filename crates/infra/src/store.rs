use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, RwLock};

use opticare_core::{DomainError, DomainResult};

/// Key/value store abstraction for record collections.
///
/// The persistence boundary of the engine: get-by-id, upsert, delete, list.
/// Implementations surface transport failures as `StorageUnavailable`;
/// business rules live above this seam.
pub trait KeyedStore<K, V>: Send + Sync {
    fn get(&self, key: &K) -> DomainResult<Option<V>>;
    fn upsert(&self, key: K, value: V) -> DomainResult<()>;
    fn remove(&self, key: &K) -> DomainResult<Option<V>>;
    fn list(&self) -> DomainResult<Vec<V>>;
}

impl<K, V, S> KeyedStore<K, V> for Arc<S>
where
    S: KeyedStore<K, V> + ?Sized,
{
    fn get(&self, key: &K) -> DomainResult<Option<V>> {
        (**self).get(key)
    }

    fn upsert(&self, key: K, value: V) -> DomainResult<()> {
        (**self).upsert(key, value)
    }

    fn remove(&self, key: &K) -> DomainResult<Option<V>> {
        (**self).remove(key)
    }

    fn list(&self) -> DomainResult<Vec<V>> {
        (**self).list()
    }
}

/// In-memory store for tests/dev. Not optimized for performance.
#[derive(Debug)]
pub struct InMemoryStore<K, V> {
    inner: RwLock<HashMap<K, V>>,
}

impl<K, V> InMemoryStore<K, V> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }
}

impl<K, V> Default for InMemoryStore<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> KeyedStore<K, V> for InMemoryStore<K, V>
where
    K: Clone + Eq + Hash + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn get(&self, key: &K) -> DomainResult<Option<V>> {
        let map = self
            .inner
            .read()
            .map_err(|_| DomainError::storage("lock poisoned"))?;
        Ok(map.get(key).cloned())
    }

    fn upsert(&self, key: K, value: V) -> DomainResult<()> {
        let mut map = self
            .inner
            .write()
            .map_err(|_| DomainError::storage("lock poisoned"))?;
        map.insert(key, value);
        Ok(())
    }

    fn remove(&self, key: &K) -> DomainResult<Option<V>> {
        let mut map = self
            .inner
            .write()
            .map_err(|_| DomainError::storage("lock poisoned"))?;
        Ok(map.remove(key))
    }

    fn list(&self) -> DomainResult<Vec<V>> {
        let map = self
            .inner
            .read()
            .map_err(|_| DomainError::storage("lock poisoned"))?;
        Ok(map.values().cloned().collect())
    }
}
