//! Route configuration and path matching.

use serde::{Deserialize, Serialize};

use crate::context::{Method, RouteParams};

/// Configuration for a single route.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteConfig {
    /// Route pattern (e.g., "/product/:id").
    pub pattern: String,
    /// Handler name, used in logs.
    pub handler: String,
    /// HTTP methods this route accepts.
    #[serde(default = "default_methods")]
    pub methods: Vec<Method>,
}

fn default_methods() -> Vec<Method> {
    vec![Method::Get]
}

impl RouteConfig {
    /// Create a new route configuration accepting GET.
    pub fn new(pattern: impl Into<String>, handler: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            handler: handler.into(),
            methods: default_methods(),
        }
    }

    /// Set allowed HTTP methods.
    pub fn with_methods(mut self, methods: Vec<Method>) -> Self {
        self.methods = methods;
        self
    }

    /// Match a request path against this pattern.
    ///
    /// `:name` segments capture one non-empty path segment. The query
    /// string is ignored, and a single trailing slash is tolerated.
    pub fn match_path(&self, path: &str) -> Option<RouteParams> {
        let path = path.split('?').next().unwrap_or_default();
        let path = path.strip_suffix('/').filter(|p| !p.is_empty()).unwrap_or(path);

        let mut pattern_segments = self.pattern.split('/');
        let mut path_segments = path.split('/');
        let mut params = RouteParams::new();

        loop {
            match (pattern_segments.next(), path_segments.next()) {
                (None, None) => return Some(params),
                (Some(expected), Some(actual)) => {
                    if let Some(name) = expected.strip_prefix(':') {
                        if actual.is_empty() {
                            return None;
                        }
                        params.insert(name.to_string(), actual.to_string());
                    } else if expected != actual {
                        return None;
                    }
                }
                _ => return None,
            }
        }
    }

    /// Whether the route accepts the given method.
    pub fn allows(&self, method: Method) -> bool {
        self.methods.contains(&method)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_captures_param() {
        let route = RouteConfig::new("/product/:id", "product");
        let params = route.match_path("/product/prod_123").unwrap();
        assert_eq!(params.get("id").map(String::as_str), Some("prod_123"));
    }

    #[test]
    fn test_match_ignores_query_and_trailing_slash() {
        let route = RouteConfig::new("/product/:id", "product");
        assert!(route.match_path("/product/prod_1?ref=home").is_some());
        assert!(route.match_path("/product/prod_1/").is_some());
    }

    #[test]
    fn test_empty_param_does_not_match() {
        let route = RouteConfig::new("/product/:id", "product");
        assert!(route.match_path("/product/").is_none());
        assert!(route.match_path("/product").is_none());
    }

    #[test]
    fn test_nested_route() {
        let route = RouteConfig::new("/product/:id/bag", "add_to_bag")
            .with_methods(vec![Method::Post]);
        let params = route.match_path("/product/p1/bag").unwrap();
        assert_eq!(params["id"], "p1");
        assert!(route.match_path("/product/p1").is_none());
        assert!(route.allows(Method::Post));
        assert!(!route.allows(Method::Get));
    }

    #[test]
    fn test_static_mismatch() {
        let route = RouteConfig::new("/product/:id", "product");
        assert!(route.match_path("/products/p1").is_none());
    }
}
