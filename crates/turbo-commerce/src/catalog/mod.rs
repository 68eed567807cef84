//! Product catalog module.
//!
//! Contains the page view model, the payment provider's wire types and the
//! retrieval seam.

mod product;
mod provider;
mod retriever;

pub use product::ProductViewModel;
pub use provider::{Expandable, ProviderPrice, ProviderProduct};
pub use retriever::{ProductRetriever, RetrievalError, RetrieveOptions, DEFAULT_PRICE};
