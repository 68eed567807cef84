//! Workload definition.

use serde::{Deserialize, Serialize};

use crate::config::RouteConfig;
use crate::context::{Method, RouteParams};

/// Workload manifest - explicit configuration for a deployable unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkloadManifest {
    /// Unique name for this workload.
    pub name: String,
    /// Semantic version.
    pub version: String,
    /// Routes this workload handles, matched in order.
    pub routes: Vec<RouteConfig>,
}

/// Outcome of routing a request against a manifest.
#[derive(Debug, Clone, PartialEq)]
pub enum RouteMatch<'a> {
    /// A route matched the path and accepts the method.
    Matched {
        /// Handler name of the matching route.
        handler: &'a str,
        /// Extracted parameters.
        params: RouteParams,
    },
    /// A route matched the path but not the method.
    MethodNotAllowed,
    /// No route matched the path.
    NotFound,
}

impl WorkloadManifest {
    /// Create a new workload manifest.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            routes: Vec::new(),
        }
    }

    /// Add a route to this workload.
    pub fn with_route(mut self, route: RouteConfig) -> Self {
        self.routes.push(route);
        self
    }

    /// Find the route serving `method` and `path`.
    pub fn route(&self, method: Method, path: &str) -> RouteMatch<'_> {
        let mut path_matched = false;
        for route in &self.routes {
            if let Some(params) = route.match_path(path) {
                if route.allows(method) {
                    return RouteMatch::Matched {
                        handler: &route.handler,
                        params,
                    };
                }
                path_matched = true;
            }
        }
        if path_matched {
            RouteMatch::MethodNotAllowed
        } else {
            RouteMatch::NotFound
        }
    }
}

/// Error type for workload operations.
#[derive(Debug, thiserror::Error)]
pub enum WorkloadError {
    #[error("Shell not sent before sections")]
    ShellNotSent,

    #[error("Streaming error: {0}")]
    StreamError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manifest() -> WorkloadManifest {
        WorkloadManifest::new("product-page", "0.1.0")
            .with_route(RouteConfig::new("/product/:id", "product"))
            .with_route(
                RouteConfig::new("/product/:id/bag", "add_to_bag").with_methods(vec![Method::Post]),
            )
    }

    #[test]
    fn test_route_matched() {
        let m = manifest();
        match m.route(Method::Get, "/product/p1") {
            RouteMatch::Matched { handler, params } => {
                assert_eq!(handler, "product");
                assert_eq!(params["id"], "p1");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_method_not_allowed() {
        assert_eq!(
            manifest().route(Method::Get, "/product/p1/bag"),
            RouteMatch::MethodNotAllowed
        );
    }

    #[test]
    fn test_not_found() {
        assert_eq!(manifest().route(Method::Get, "/cart"), RouteMatch::NotFound);
        assert_eq!(manifest().route(Method::Get, "/product/"), RouteMatch::NotFound);
    }
}
