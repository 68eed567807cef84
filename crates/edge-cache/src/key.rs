//! Cache key composition.

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde::{Deserialize, Serialize};

/// Namespace for generated page props.
pub const PAGE_KEY_PREFIX: &str = "isr";

/// Characters escaped in key segments: the separator and the escape itself.
const SEGMENT: &AsciiSet = &CONTROLS.add(b':').add(b'%').add(b' ');

/// A cache key uniquely identifying a cached entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheKey(String);

impl CacheKey {
    /// Create a cache key from a string.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Key for the generated props of one page, e.g. `isr:product:prod_123`.
    ///
    /// The identifier is percent-escaped, so distinct ids never share a key.
    pub fn page(route: &str, id: &str) -> Self {
        Self(format!(
            "{}:{}:{}",
            PAGE_KEY_PREFIX,
            route,
            utf8_percent_encode(id, SEGMENT)
        ))
    }

    /// Get the key string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
