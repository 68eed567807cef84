//! Public SDK for storefront workloads on the edge streaming SSR platform.
//!
//! This crate re-exports all platform functionality:
//!
//! ```ignore
//! use edge_sdk::prelude::*;
//!
//! let logger = StructuredLogger::new(ctx.request_id.clone()).with_workload("product-page");
//! let generation = StaticGeneration::new(store);
//!
//! match generation.lookup::<Props>(&CacheKey::page("product", id), unix_now())? {
//!     Lookup::Fresh(entry) => sink.send_section("product", &render(&entry.props)).await?,
//!     Lookup::Stale(entry) => { /* serve, then regenerate */ }
//!     Lookup::Missing => sink.send_section("skeleton", &skeleton()).await?,
//! }
//! ```

pub use edge_cache;
pub use edge_core;
pub use edge_data;
pub use edge_observability;
pub use edge_streaming;

/// Prelude for convenient imports.
pub mod prelude {
    pub use edge_cache::*;
    pub use edge_core::*;
    pub use edge_data::*;
    pub use edge_observability::*;
    pub use edge_streaming::*;
}
