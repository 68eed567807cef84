//! Cache policies and incremental static generation for storefront pages.
//!
//! This crate provides:
//! - `RouteCachePolicy` - Cache-Control for generated pages
//! - `StaticGeneration` - Generated props with a revalidation window
//! - `StaticPaths` / `FallbackMode` - Which paths exist ahead of time
//! - `CacheHeadersBuilder` - Response headers, including debug headers
//!
//! # Example
//!
//! ```ignore
//! use std::time::Duration;
//! use edge_cache::{CacheKey, InMemoryPropsStore, Lookup, StaticGeneration};
//!
//! let generation = StaticGeneration::new(InMemoryPropsStore::new());
//! let key = CacheKey::page("product", "prod_123");
//!
//! match generation.lookup::<Product>(&key, unix_now())? {
//!     Lookup::Fresh(entry) => render(&entry.props),
//!     Lookup::Stale(entry) => { render(&entry.props); revalidate() }
//!     Lookup::Missing => render_fallback(),
//! }
//! ```

mod headers;
mod isr;
mod key;
mod policy;

pub use headers::*;
pub use isr::*;
pub use key::*;
pub use policy::*;
