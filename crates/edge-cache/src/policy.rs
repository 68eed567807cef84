//! Route-level cache policies.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Cache scope determining who can cache the response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheScope {
    /// Cacheable by CDN and browser (shared cache).
    Public,
    /// Cacheable by the browser only.
    Private,
    /// No caching.
    #[default]
    None,
}

impl CacheScope {
    /// Get the Cache-Control directive for this scope.
    pub fn cache_control_directive(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Private => "private",
            Self::None => "no-store",
        }
    }
}

/// How long a shared cache may serve stale content while it revalidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "secs")]
pub enum SwrWindow {
    /// Serve stale until the revalidation lands.
    Unbounded,
    /// Serve stale for at most this long.
    Bounded(u64),
}

/// Vary rule for cache key variance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum VaryRule {
    /// Vary by HTTP header.
    Header(String),
    /// Vary by cookie.
    Cookie(String),
}

impl VaryRule {
    /// Create a header vary rule.
    pub fn header(name: impl Into<String>) -> Self {
        Self::Header(name.into())
    }

    /// Create a cookie vary rule.
    pub fn cookie(name: impl Into<String>) -> Self {
        Self::Cookie(name.into())
    }
}

/// Route-level cache policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteCachePolicy {
    /// Cache scope.
    pub scope: CacheScope,
    /// Browser max-age.
    pub max_age: Duration,
    /// Shared-cache lifetime (`s-maxage`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shared_max_age: Option<Duration>,
    /// Stale-while-revalidate window.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stale_while_revalidate: Option<SwrWindow>,
    /// Vary rules.
    pub vary: Vec<VaryRule>,
    /// Cache tags for invalidation.
    pub tags: Vec<String>,
}

impl Default for RouteCachePolicy {
    fn default() -> Self {
        Self {
            scope: CacheScope::None,
            max_age: Duration::ZERO,
            shared_max_age: None,
            stale_while_revalidate: None,
            vary: Vec::new(),
            tags: Vec::new(),
        }
    }
}

impl RouteCachePolicy {
    /// A policy that forbids caching.
    pub fn none() -> Self {
        Self::default()
    }

    /// Per-shopper content: the browser must not store it either.
    pub fn private_no_store() -> Self {
        Self {
            scope: CacheScope::Private,
            ..Default::default()
        }
    }

    /// Create a public cache policy.
    pub fn public(max_age: Duration) -> Self {
        Self {
            scope: CacheScope::Public,
            max_age,
            ..Default::default()
        }
    }

    /// Policy for a statically generated page with a revalidation window.
    ///
    /// Shared caches keep the page for `revalidate` and may keep serving it
    /// while a newer generation is produced. Browsers always revalidate.
    pub fn revalidate(revalidate: Duration) -> Self {
        Self {
            scope: CacheScope::Public,
            max_age: Duration::ZERO,
            shared_max_age: Some(revalidate),
            stale_while_revalidate: Some(SwrWindow::Unbounded),
            ..Default::default()
        }
    }

    /// Set the stale-while-revalidate window.
    pub fn with_swr(mut self, window: SwrWindow) -> Self {
        self.stale_while_revalidate = Some(window);
        self
    }

    /// Add a vary rule.
    pub fn vary_on(mut self, rule: VaryRule) -> Self {
        self.vary.push(rule);
        self
    }

    /// Add a cache tag for invalidation.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Generate the Cache-Control header value.
    pub fn cache_control_header(&self) -> String {
        match self.scope {
            CacheScope::None => return "no-store".to_string(),
            CacheScope::Private if self.max_age.is_zero() => {
                return "private, no-store".to_string();
            }
            _ => {}
        }

        let mut parts = vec![self.scope.cache_control_directive().to_string()];

        // With s-maxage and no browser lifetime, only shared caches hold the page.
        let shared_only = self.shared_max_age.is_some() && self.max_age.is_zero();
        if !shared_only {
            parts.push(format!("max-age={}", self.max_age.as_secs()));
        }

        if let Some(shared) = self.shared_max_age {
            parts.push(format!("s-maxage={}", shared.as_secs()));
        }

        match self.stale_while_revalidate {
            Some(SwrWindow::Unbounded) => parts.push("stale-while-revalidate".to_string()),
            Some(SwrWindow::Bounded(secs)) => {
                parts.push(format!("stale-while-revalidate={}", secs))
            }
            None => {}
        }

        parts.join(", ")
    }

    /// Generate the Vary header value.
    pub fn vary_header(&self) -> Option<String> {
        let mut headers: Vec<String> = Vec::new();
        for rule in &self.vary {
            let name = match rule {
                VaryRule::Header(h) => h.clone(),
                VaryRule::Cookie(_) => "Cookie".to_string(),
            };
            if !headers.contains(&name) {
                headers.push(name);
            }
        }

        if headers.is_empty() {
            None
        } else {
            Some(headers.join(", "))
        }
    }
}
