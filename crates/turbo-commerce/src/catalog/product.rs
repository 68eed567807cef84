//! Product view model.

use crate::ids::{PriceId, ProductId};
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};

/// The product as the page renders it.
///
/// Built once per generation pass and never mutated afterwards; a new pass
/// replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductViewModel {
    /// Provider product identifier.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Long description.
    pub description: String,
    /// First provider image, if the product has any.
    pub image_url: Option<String>,
    /// Default price in minor units, exactly as the provider reports it.
    pub price: i64,
    /// Identifier of the default price object.
    pub price_id: PriceId,
}

impl ProductViewModel {
    /// The price as money in the given display currency.
    pub fn price_in(&self, currency: Currency) -> Money {
        Money::new(self.price, currency)
    }
}
