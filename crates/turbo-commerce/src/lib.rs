//! Storefront domain types for TurboCommerce workloads.
//!
//! - **Catalog**: `ProductViewModel`, payment-provider wire types and the
//!   `ProductRetriever` seam
//! - **Money**: minor-unit amounts with locale-aware formatting
//! - **Cart**: the shopper's `Bag` behind the `CartStore` seam
//! - **Notify**: toasts behind the `Notifier` seam
//!
//! # Example
//!
//! ```rust
//! use turbo_commerce::prelude::*;
//!
//! let price = Money::new(9990, Currency::BRL);
//! assert_eq!(price.format(Locale::PtBr), "R$ 99,90");
//! ```

pub mod error;
pub mod ids;
pub mod money;

pub mod cart;
pub mod catalog;
pub mod notify;

pub use error::CommerceError;
pub use ids::*;
pub use money::{Currency, Locale, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::{Currency, Locale, Money};

    // Catalog
    pub use crate::catalog::{
        Expandable, ProductRetriever, ProductViewModel, ProviderPrice, ProviderProduct,
        RetrievalError, RetrieveOptions,
    };

    // Cart
    pub use crate::cart::{Bag, BagItem, CartStore};

    // Notifications
    pub use crate::notify::{Notifier, Toast, ToastKind, ToastLog};
}
