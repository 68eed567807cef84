//! Key-Value store wrapper with automatic serialization.

use std::collections::HashMap;
use std::sync::Mutex;

use edge_cache::{CacheKey, PropsStore};
use serde::{de::DeserializeOwned, Serialize};

use crate::CacheError;

enum Backend {
    #[cfg(target_arch = "wasm32")]
    Spin(spin_sdk::key_value::Store),
    Memory(Mutex<HashMap<String, Vec<u8>>>),
}

/// Type-safe cache backed by Spin's Key-Value Store.
///
/// Provides automatic JSON serialization for any type that implements
/// `Serialize` and `DeserializeOwned`.
pub struct Cache {
    backend: Backend,
}

impl Cache {
    /// Open the default Key-Value store.
    #[cfg(target_arch = "wasm32")]
    pub fn open_default() -> Result<Self, CacheError> {
        let store = spin_sdk::key_value::Store::open_default()
            .map_err(|e| CacheError::OpenError(e.to_string()))?;
        Ok(Self {
            backend: Backend::Spin(store),
        })
    }

    /// Open a named Key-Value store.
    #[cfg(target_arch = "wasm32")]
    pub fn open(name: &str) -> Result<Self, CacheError> {
        let store = spin_sdk::key_value::Store::open(name)
            .map_err(|e| CacheError::OpenError(e.to_string()))?;
        Ok(Self {
            backend: Backend::Spin(store),
        })
    }

    // Off wasm32 every open yields a fresh in-process store.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn open_default() -> Result<Self, CacheError> {
        Ok(Self::in_memory())
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn open(_name: &str) -> Result<Self, CacheError> {
        Ok(Self::in_memory())
    }

    /// An empty in-process store.
    pub fn in_memory() -> Self {
        Self {
            backend: Backend::Memory(Mutex::new(HashMap::new())),
        }
    }

    /// Get raw bytes for a key.
    pub fn get_bytes(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        match &self.backend {
            #[cfg(target_arch = "wasm32")]
            Backend::Spin(store) => store
                .get(key)
                .map_err(|e| CacheError::StoreError(e.to_string())),
            Backend::Memory(map) => Ok(lock(map)?.get(key).cloned()),
        }
    }

    /// Set raw bytes for a key.
    pub fn set_bytes(&self, key: &str, bytes: &[u8]) -> Result<(), CacheError> {
        match &self.backend {
            #[cfg(target_arch = "wasm32")]
            Backend::Spin(store) => store
                .set(key, bytes)
                .map_err(|e| CacheError::StoreError(e.to_string())),
            Backend::Memory(map) => {
                lock(map)?.insert(key.to_string(), bytes.to_vec());
                Ok(())
            }
        }
    }

    /// Get a value from the cache.
    ///
    /// Returns `None` if the key doesn't exist.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CacheError> {
        match self.get_bytes(key)? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Set a value in the cache.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), CacheError> {
        let bytes = serde_json::to_vec(value)?;
        self.set_bytes(key, &bytes)
    }

    /// Delete a value from the cache.
    pub fn delete(&self, key: &str) -> Result<(), CacheError> {
        match &self.backend {
            #[cfg(target_arch = "wasm32")]
            Backend::Spin(store) => store
                .delete(key)
                .map_err(|e| CacheError::StoreError(e.to_string())),
            Backend::Memory(map) => {
                lock(map)?.remove(key);
                Ok(())
            }
        }
    }

    /// Check if a key exists in the cache.
    pub fn exists(&self, key: &str) -> Result<bool, CacheError> {
        match &self.backend {
            #[cfg(target_arch = "wasm32")]
            Backend::Spin(store) => store
                .exists(key)
                .map_err(|e| CacheError::StoreError(e.to_string())),
            Backend::Memory(map) => Ok(lock(map)?.contains_key(key)),
        }
    }
}

fn lock(
    map: &Mutex<HashMap<String, Vec<u8>>>,
) -> Result<std::sync::MutexGuard<'_, HashMap<String, Vec<u8>>>, CacheError> {
    map.lock()
        .map_err(|_| CacheError::StoreError("in-memory store lock poisoned".to_string()))
}

/// Generated pages live in the same Key-Value store as sessions.
impl PropsStore for Cache {
    fn load(&self, key: &CacheKey) -> edge_cache::CacheResult<Option<Vec<u8>>> {
        Ok(self.get_bytes(key.as_str())?)
    }

    fn save(&self, key: &CacheKey, bytes: &[u8]) -> edge_cache::CacheResult<()> {
        Ok(self.set_bytes(key.as_str(), bytes)?)
    }

    fn remove(&self, key: &CacheKey) -> edge_cache::CacheResult<()> {
        Ok(self.delete(key.as_str())?)
    }
}

/// Helper to build cache keys with namespacing.
///
/// ```rust
/// let key = turbo_cache::cache_key!("session", "sess_abc");
/// assert_eq!(key, "session:sess_abc");
/// ```
#[macro_export]
macro_rules! cache_key {
    ($prefix:expr, $($part:expr),+) => {{
        let mut key = String::from($prefix);
        $(
            key.push(':');
            key.push_str(&$part.to_string());
        )+
        key
    }};
}
