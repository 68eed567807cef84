//! Session management using Key-Value store.

use crate::{cache_key, Cache, CacheError};
use edge_cache::unix_now;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

const SESSION_PREFIX: &str = "sess_";

/// A unique session identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(String);

impl SessionId {
    /// Create a new session ID from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a new cryptographically secure session ID.
    pub fn generate() -> Self {
        use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
        use rand::Rng;

        let bytes: [u8; 18] = rand::thread_rng().gen();
        Self(format!("{}{}", SESSION_PREFIX, URL_SAFE_NO_PAD.encode(bytes)))
    }

    /// Accept a client-supplied id (e.g. from a cookie) only if it has the
    /// shape `generate` produces.
    pub fn parse(value: &str) -> Option<Self> {
        let body = value.strip_prefix(SESSION_PREFIX)?;
        let well_formed = !body.is_empty()
            && body.len() <= 64
            && body
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');
        well_formed.then(|| Self(value.to_string()))
    }

    /// Get the session ID as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for SessionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for SessionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Session data stored in the cache.
///
/// Generic over the user data type `T`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionData<T> {
    /// The session ID.
    pub id: SessionId,
    /// User-defined session data.
    pub data: T,
    /// Incremented on every write.
    pub version: u64,
    /// When the session was created (Unix timestamp).
    pub created_at: u64,
    /// When the session was last written (Unix timestamp).
    pub last_accessed: u64,
}

/// Session manager for shopper sessions.
///
/// The Key-Value store has no compare-and-swap, so concurrent writers to
/// the same session resolve as last writer wins.
pub struct Session<T> {
    cache: Cache,
    _phantom: std::marker::PhantomData<T>,
}

impl<T> Session<T>
where
    T: Serialize + DeserializeOwned + Default + Clone,
{
    /// Create a new session manager using the default store.
    pub fn new() -> Result<Self, CacheError> {
        Ok(Self::with_cache(Cache::open_default()?))
    }

    /// Create a new session manager using a named store.
    pub fn with_store(name: &str) -> Result<Self, CacheError> {
        Ok(Self::with_cache(Cache::open(name)?))
    }

    /// Create a session manager over an already-open cache.
    pub fn with_cache(cache: Cache) -> Self {
        Self {
            cache,
            _phantom: std::marker::PhantomData,
        }
    }

    /// Get session data, or the default if the session doesn't exist.
    ///
    /// Nothing is written for a missing session.
    pub fn get_or_default(&self, id: &SessionId) -> Result<T, CacheError> {
        Ok(self.get(id)?.unwrap_or_default())
    }

    /// Get session data if it exists.
    pub fn get(&self, id: &SessionId) -> Result<Option<T>, CacheError> {
        Ok(self.get_versioned(id)?.map(|s| s.data))
    }

    /// Get full session data including version.
    pub fn get_versioned(&self, id: &SessionId) -> Result<Option<SessionData<T>>, CacheError> {
        self.cache.get::<SessionData<T>>(&self.session_key(id))
    }

    /// Set session data (unconditional write).
    pub fn set(&self, id: &SessionId, data: &T) -> Result<(), CacheError> {
        let current = self.get_versioned(id)?;
        self.write(id, data.clone(), current.as_ref())
    }

    /// Read, modify and write back the session, creating it if missing.
    ///
    /// Returns the data as written.
    pub fn update<F>(&self, id: &SessionId, f: F) -> Result<T, CacheError>
    where
        F: FnOnce(&mut T),
    {
        let current = self.get_versioned(id)?;
        let mut data = current
            .as_ref()
            .map(|s| s.data.clone())
            .unwrap_or_default();
        f(&mut data);
        self.write(id, data.clone(), current.as_ref())?;
        Ok(data)
    }

    /// Delete a session.
    pub fn delete(&self, id: &SessionId) -> Result<(), CacheError> {
        self.cache.delete(&self.session_key(id))
    }

    /// Check if a session exists.
    pub fn exists(&self, id: &SessionId) -> Result<bool, CacheError> {
        self.cache.exists(&self.session_key(id))
    }

    fn write(
        &self,
        id: &SessionId,
        data: T,
        previous: Option<&SessionData<T>>,
    ) -> Result<(), CacheError> {
        let now = unix_now();
        let session_data = SessionData {
            id: id.clone(),
            data,
            version: previous.map(|s| s.version + 1).unwrap_or(1),
            created_at: previous.map(|s| s.created_at).unwrap_or(now),
            last_accessed: now,
        };
        self.cache.set(&self.session_key(id), &session_data)
    }

    fn session_key(&self, id: &SessionId) -> String {
        cache_key!("session", id)
    }
}
