//! Bag and bag item types.

use crate::catalog::ProductViewModel;
use crate::error::CommerceError;
use crate::ids::ProductId;
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};

/// Cart collection keyed by product id.
///
/// Both operations are infallible from the caller's point of view.
pub trait CartStore {
    /// Whether an item with this product id is already present.
    fn check_if_exists(&self, id: &ProductId) -> bool;

    /// Insert a product.
    fn add(&mut self, product: ProductViewModel);
}

/// A product held in the bag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BagItem {
    /// The product as it was displayed when added.
    pub product: ProductViewModel,
    /// Units of this product.
    pub quantity: u32,
}

/// The shopper's bag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bag {
    items: Vec<BagItem>,
}

impl Bag {
    /// Create an empty bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Items in insertion order.
    pub fn items(&self) -> &[BagItem] {
        &self.items
    }

    /// Find an item by product id.
    pub fn get(&self, id: &ProductId) -> Option<&BagItem> {
        self.items.iter().find(|item| &item.product.id == id)
    }

    /// Number of distinct products.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the bag is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total units across all items.
    pub fn count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    /// Sum of price times quantity, in the display currency.
    pub fn total(&self, currency: Currency) -> Result<Money, CommerceError> {
        self.items.iter().try_fold(Money::zero(currency), |acc, item| {
            let line = item
                .product
                .price_in(currency)
                .try_multiply(i64::from(item.quantity))?;
            acc.try_add(&line)
        })
    }
}

impl CartStore for Bag {
    fn check_if_exists(&self, id: &ProductId) -> bool {
        self.get(id).is_some()
    }

    /// Adding a product already present bumps its quantity rather than
    /// creating a second entry.
    fn add(&mut self, product: ProductViewModel) {
        match self.items.iter_mut().find(|item| item.product.id == product.id) {
            Some(existing) => existing.quantity = existing.quantity.saturating_add(1),
            None => self.items.push(BagItem {
                product,
                quantity: 1,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::PriceId;

    fn product(id: &str, price: i64) -> ProductViewModel {
        ProductViewModel {
            id: ProductId::new(id),
            name: format!("Produto {}", id),
            description: String::new(),
            image_url: None,
            price,
            price_id: PriceId::new(format!("price_{}", id)),
        }
    }

    #[test]
    fn test_add_and_check() {
        let mut bag = Bag::new();
        assert!(!bag.check_if_exists(&ProductId::new("p1")));

        bag.add(product("p1", 9990));
        assert!(bag.check_if_exists(&ProductId::new("p1")));
        assert_eq!(bag.len(), 1);
        assert_eq!(bag.count(), 1);
    }

    #[test]
    fn test_repeat_add_merges() {
        let mut bag = Bag::new();
        bag.add(product("p1", 9990));
        bag.add(product("p1", 9990));
        assert_eq!(bag.len(), 1);
        assert_eq!(bag.get(&ProductId::new("p1")).unwrap().quantity, 2);
    }

    #[test]
    fn test_total() {
        let mut bag = Bag::new();
        bag.add(product("p1", 9990));
        bag.add(product("p2", 5000));
        bag.add(product("p2", 5000));
        let total = bag.total(Currency::BRL).unwrap();
        assert_eq!(total.amount_minor, 19990);
    }

    #[test]
    fn test_round_trips_through_json() {
        let mut bag = Bag::new();
        bag.add(product("p1", 9990));
        let json = serde_json::to_vec(&bag).unwrap();
        let back: Bag = serde_json::from_slice(&json).unwrap();
        assert_eq!(back, bag);
    }
}
