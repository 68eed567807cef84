//! Newtype IDs for type-safe identifiers.
//!
//! Product and price ids both come from the payment provider as opaque
//! strings; the newtypes keep a price id from being looked up as a product.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Macro to generate newtype ID structs.
macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from a string.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the ID as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume and return the inner string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(
    /// Payment-provider product identifier (`prod_...`).
    ProductId
);
define_id!(
    /// Payment-provider price identifier (`price_...`), used at checkout.
    PriceId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_creation() {
        let id = ProductId::new("prod_123");
        assert_eq!(id.as_str(), "prod_123");
    }

    #[test]
    fn test_id_from_str() {
        let id: PriceId = "price_1".into();
        assert_eq!(id.to_string(), "price_1");
    }

    #[test]
    fn test_id_serializes_as_plain_string() {
        let json = serde_json::to_string(&ProductId::new("p1")).unwrap();
        assert_eq!(json, r#""p1""#);
        let back: ProductId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ProductId::new("p1"));
    }
}
