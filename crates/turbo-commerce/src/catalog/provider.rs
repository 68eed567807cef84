//! Payment provider wire types.
//!
//! Only the fields the storefront consumes are modelled; unknown fields are
//! ignored on decode.

use crate::ids::{PriceId, ProductId};
use serde::{Deserialize, Serialize};

/// A field the provider returns either as a bare id or, when requested via
/// `expand`, as the full object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Expandable<T> {
    /// Not expanded: only the id.
    Id(String),
    /// Expanded object.
    Object(Box<T>),
}

impl<T> Expandable<T> {
    /// The expanded object, if present.
    pub fn as_object(&self) -> Option<&T> {
        match self {
            Expandable::Object(obj) => Some(obj),
            Expandable::Id(_) => None,
        }
    }
}

/// Product record as returned by the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderProduct {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub default_price: Option<Expandable<ProviderPrice>>,
}

impl ProviderProduct {
    /// The expanded default price, if the product has one.
    pub fn default_price(&self) -> Option<&ProviderPrice> {
        self.default_price.as_ref().and_then(Expandable::as_object)
    }
}

/// Price record as returned by the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderPrice {
    pub id: PriceId,
    /// Minor units; `null` for custom-amount prices.
    #[serde(default)]
    pub unit_amount: Option<i64>,
    #[serde(default)]
    pub currency: Option<String>,
}
