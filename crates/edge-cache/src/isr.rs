//! Incremental static generation.
//!
//! Pages are generated on demand from props, kept for a revalidation
//! window, and regenerated in the background once that window has passed.
//! The props store only holds serialized props; rendering happens per
//! request.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::key::CacheKey;

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Cache operation errors.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// Failed to serialize/deserialize a cache entry.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Backend storage error.
    #[error("storage error: {0}")]
    Storage(String),
}

/// Status of a cache lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheStatus {
    /// Fresh cache hit.
    Hit,
    /// Cache miss.
    Miss,
    /// Stale hit (serving while revalidating).
    Stale,
    /// Caching not applicable to this response.
    Bypass,
}

impl std::fmt::Display for CacheStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Hit => write!(f, "HIT"),
            Self::Miss => write!(f, "MISS"),
            Self::Stale => write!(f, "STALE"),
            Self::Bypass => write!(f, "BYPASS"),
        }
    }
}

/// What happens when a path that was not generated ahead of time is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FallbackMode {
    /// Serve a pending placeholder immediately, generate, then swap in the page.
    Pending,
    /// Generate before responding.
    Blocking,
    /// Unknown paths are not found.
    NotFound,
}

/// Paths generated ahead of time, and the policy for all others.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticPaths {
    /// Identifiers generated ahead of time.
    pub paths: Vec<String>,
    /// Behavior for identifiers not in `paths`.
    pub fallback: FallbackMode,
}

impl StaticPaths {
    /// No paths ahead of time; every path is generated on first request.
    pub fn lazy() -> Self {
        Self {
            paths: Vec::new(),
            fallback: FallbackMode::Pending,
        }
    }

    /// Whether an identifier was generated ahead of time.
    pub fn is_known(&self, id: &str) -> bool {
        self.paths.iter().any(|p| p == id)
    }
}

/// Outcome of resolving the props for one page.
#[derive(Debug, Clone, PartialEq)]
pub enum StaticProps<P> {
    /// The page exists; keep it for `revalidate` before regenerating.
    Props {
        /// The page props.
        props: P,
        /// Revalidation window.
        revalidate: Duration,
    },
    /// The page does not exist.
    NotFound,
}

impl<P> StaticProps<P> {
    /// The props, if the page exists.
    pub fn into_props(self) -> Option<P> {
        match self {
            Self::Props { props, .. } => Some(props),
            Self::NotFound => None,
        }
    }

    /// Whether the page does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }
}

/// A stored generation of page props.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedProps<P> {
    /// The props.
    pub props: P,
    /// Unix timestamp (seconds) of the generation.
    pub generated_at: u64,
    /// Revalidation window in seconds.
    pub revalidate_secs: u64,
}

impl<P> GeneratedProps<P> {
    /// Age in seconds at `now`.
    pub fn age(&self, now: u64) -> u64 {
        now.saturating_sub(self.generated_at)
    }

    /// Whether the revalidation window has passed at `now`.
    pub fn is_stale(&self, now: u64) -> bool {
        self.age(now) > self.revalidate_secs
    }

    /// Seconds left before the entry turns stale.
    pub fn remaining(&self, now: u64) -> u64 {
        self.revalidate_secs.saturating_sub(self.age(now))
    }
}

/// Result of looking up generated props.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<P> {
    /// Within the revalidation window.
    Fresh(GeneratedProps<P>),
    /// Past the window; serve it, then regenerate.
    Stale(GeneratedProps<P>),
    /// Never generated (or removed).
    Missing,
}

impl<P> Lookup<P> {
    /// Cache status reported for this lookup.
    pub fn status(&self) -> CacheStatus {
        match self {
            Self::Fresh(_) => CacheStatus::Hit,
            Self::Stale(_) => CacheStatus::Stale,
            Self::Missing => CacheStatus::Miss,
        }
    }

    /// The stored generation, fresh or stale.
    pub fn into_generated(self) -> Option<GeneratedProps<P>> {
        match self {
            Self::Fresh(entry) | Self::Stale(entry) => Some(entry),
            Self::Missing => None,
        }
    }
}

/// Storage backend for serialized props.
pub trait PropsStore {
    /// Load the serialized entry for a key.
    fn load(&self, key: &CacheKey) -> CacheResult<Option<Vec<u8>>>;

    /// Store a serialized entry, replacing any previous one.
    fn save(&self, key: &CacheKey, bytes: &[u8]) -> CacheResult<()>;

    /// Remove an entry.
    fn remove(&self, key: &CacheKey) -> CacheResult<()>;
}

/// In-process props store.
#[derive(Debug, Default)]
pub struct InMemoryPropsStore {
    entries: Mutex<HashMap<String, Vec<u8>>>,
}

impl InMemoryPropsStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn with_entries<T>(&self, f: impl FnOnce(&mut HashMap<String, Vec<u8>>) -> T) -> CacheResult<T> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| CacheError::Storage(e.to_string()))?;
        Ok(f(&mut entries))
    }
}

impl PropsStore for InMemoryPropsStore {
    fn load(&self, key: &CacheKey) -> CacheResult<Option<Vec<u8>>> {
        self.with_entries(|entries| entries.get(key.as_str()).cloned())
    }

    fn save(&self, key: &CacheKey, bytes: &[u8]) -> CacheResult<()> {
        self.with_entries(|entries| {
            entries.insert(key.as_str().to_string(), bytes.to_vec());
        })
    }

    fn remove(&self, key: &CacheKey) -> CacheResult<()> {
        self.with_entries(|entries| {
            entries.remove(key.as_str());
        })
    }
}

/// Generated-props cache with stale-while-revalidate lookups.
#[derive(Debug)]
pub struct StaticGeneration<S: PropsStore> {
    store: S,
}

impl<S: PropsStore> StaticGeneration<S> {
    /// Create over a props store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Look up the generated props for a page at time `now`.
    pub fn lookup<P: DeserializeOwned>(&self, key: &CacheKey, now: u64) -> CacheResult<Lookup<P>> {
        let Some(bytes) = self.store.load(key)? else {
            return Ok(Lookup::Missing);
        };
        let entry: GeneratedProps<P> = serde_json::from_slice(&bytes)?;
        if entry.is_stale(now) {
            Ok(Lookup::Stale(entry))
        } else {
            Ok(Lookup::Fresh(entry))
        }
    }

    /// Record the outcome of a generation pass.
    ///
    /// Props replace the previous generation. A not-found outcome removes
    /// it, so the path stops resolving.
    pub fn record<P: Serialize>(
        &self,
        key: &CacheKey,
        outcome: &StaticProps<P>,
        now: u64,
    ) -> CacheResult<()> {
        match outcome {
            StaticProps::Props { props, revalidate } => {
                let entry = GeneratedProps {
                    props,
                    generated_at: now,
                    revalidate_secs: revalidate.as_secs(),
                };
                let bytes = serde_json::to_vec(&entry)?;
                self.store.save(key, &bytes)
            }
            StaticProps::NotFound => self.store.remove(key),
        }
    }

    /// Access the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }
}

/// Current Unix timestamp in seconds.
pub fn unix_now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
