//! Response cache headers.

use crate::isr::CacheStatus;
use crate::key::CacheKey;
use crate::policy::RouteCachePolicy;

/// Header names for cache debugging.
pub mod header_names {
    /// Cache status header (HIT, MISS, STALE, BYPASS).
    pub const X_CACHE_STATUS: &str = "X-Cache-Status";
    /// Cache key used for lookup.
    pub const X_CACHE_KEY: &str = "X-Cache-Key";
    /// Cache tags for invalidation.
    pub const X_CACHE_TAGS: &str = "X-Cache-Tags";
    /// Request ID for tracing.
    pub const X_REQUEST_ID: &str = "X-Request-ID";
}

/// Builder for cache response headers.
#[derive(Debug, Default)]
pub struct CacheHeadersBuilder {
    cache_control: Option<String>,
    vary: Option<String>,
    age: Option<u64>,
    status: Option<CacheStatus>,
    key: Option<String>,
    tags: Vec<String>,
    include_debug: bool,
}

impl CacheHeadersBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set Cache-Control, Vary and tags from a policy.
    pub fn from_policy(mut self, policy: &RouteCachePolicy) -> Self {
        self.cache_control = Some(policy.cache_control_header());
        self.vary = policy.vary_header();
        self.tags = policy.tags.clone();
        self
    }

    /// Set the Age header.
    pub fn age(mut self, seconds: u64) -> Self {
        self.age = Some(seconds);
        self
    }

    /// Set the cache status reported in debug headers.
    pub fn status(mut self, status: CacheStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Set the cache key reported in debug headers.
    pub fn key(mut self, key: &CacheKey) -> Self {
        self.key = Some(key.as_str().to_string());
        self
    }

    /// Enable debug headers in output.
    pub fn include_debug(mut self, enabled: bool) -> Self {
        self.include_debug = enabled;
        self
    }

    /// Build the headers.
    ///
    /// `X-Cache-Status` is always emitted when set; key and tags only in
    /// debug mode.
    pub fn build(self) -> Vec<(String, String)> {
        let mut headers = Vec::new();

        if let Some(cc) = self.cache_control {
            headers.push(("Cache-Control".to_string(), cc));
        }

        if let Some(vary) = self.vary {
            headers.push(("Vary".to_string(), vary));
        }

        if let Some(age) = self.age {
            headers.push(("Age".to_string(), age.to_string()));
        }

        if let Some(status) = self.status {
            headers.push((header_names::X_CACHE_STATUS.to_string(), status.to_string()));
        }

        if self.include_debug {
            if let Some(key) = self.key {
                headers.push((header_names::X_CACHE_KEY.to_string(), key));
            }
            if !self.tags.is_empty() {
                headers.push((header_names::X_CACHE_TAGS.to_string(), self.tags.join(", ")));
            }
        }

        headers
    }
}

/// Whether the request asked for cache debug headers (`X-Debug-Cache: 1`).
pub fn should_include_debug_headers(debug_header: Option<&str>) -> bool {
    debug_header == Some("1")
}
