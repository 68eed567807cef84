//! Product retrieval seam.

use async_trait::async_trait;
use thiserror::Error;

use crate::catalog::ProviderProduct;
use crate::ids::ProductId;

/// Expansion path for a product's default price.
pub const DEFAULT_PRICE: &str = "default_price";

/// Options for a product retrieval.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RetrieveOptions {
    /// Related objects to expand inline.
    pub expand: Vec<String>,
}

impl RetrieveOptions {
    /// Request a related object expanded inline.
    pub fn expand(mut self, field: impl Into<String>) -> Self {
        self.expand.push(field.into());
        self
    }

    /// Options that expand the default price.
    pub fn with_default_price() -> Self {
        Self::default().expand(DEFAULT_PRICE)
    }
}

/// Failure retrieving a product from the provider.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RetrievalError {
    /// The provider has no product with this id.
    #[error("Product not found: {0}")]
    NotFound(String),

    /// The provider rejected our credentials.
    #[error("Payment provider rejected credentials")]
    Unauthorized,

    /// The request never produced a response.
    #[error("Network error: {0}")]
    Network(String),

    /// The provider answered with an error status.
    #[error("Provider error {status}: {message}")]
    Provider { status: u16, message: String },

    /// The response could not be decoded.
    #[error("Decode error: {0}")]
    Decode(String),
}

/// Fetches a product record from the payment provider in one round trip.
///
/// Workloads run single-threaded, so futures are not required to be `Send`.
#[async_trait(?Send)]
pub trait ProductRetriever {
    async fn retrieve_product(
        &self,
        id: &ProductId,
        options: &RetrieveOptions,
    ) -> Result<ProviderProduct, RetrievalError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_price_expansion() {
        let options = RetrieveOptions::with_default_price();
        assert_eq!(options.expand, vec!["default_price".to_string()]);
    }
}
