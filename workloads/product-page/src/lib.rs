//! Ignite Shop product detail page.
//!
//! Serves `/product/{id}` as a statically generated page: props are
//! fetched from Stripe on the first request, kept in the key-value store
//! for the revalidation window, and regenerated after a stale response.
//! Adding to the bag is a form post that flashes a toast and redirects
//! back to the page.

mod config;
mod controller;
mod data;
#[cfg(target_arch = "wasm32")]
mod handler;
mod page;
pub mod sections;
mod shopper;
#[cfg(test)]
mod testing;

use edge_sdk::edge_core::{Method, RequestContext, RouteConfig, WorkloadManifest};
use edge_sdk::edge_data::decode_component;

pub use config::*;
pub use controller::*;
pub use data::*;
pub use page::*;
pub use shopper::*;

/// Name of this workload in logs and the manifest.
pub const WORKLOAD_NAME: &str = "product-page";

/// Handler serving the page.
pub const PRODUCT_HANDLER: &str = "product";

/// Handler for the add-to-bag form.
pub const ADD_TO_BAG_HANDLER: &str = "add_to_bag";

/// Routes served by this workload.
pub fn manifest() -> WorkloadManifest {
    WorkloadManifest::new(WORKLOAD_NAME, env!("CARGO_PKG_VERSION"))
        .with_route(RouteConfig::new("/product/:id", PRODUCT_HANDLER))
        // Without an id the page still renders, as not found.
        .with_route(RouteConfig::new("/product", PRODUCT_HANDLER))
        .with_route(
            RouteConfig::new("/product/:id/bag", ADD_TO_BAG_HANDLER)
                .with_methods(vec![Method::Post]),
        )
}

/// The decoded `id` route parameter. Undecodable ids are treated as absent.
pub fn product_id(ctx: &RequestContext) -> Option<String> {
    ctx.param("id").and_then(decode_component)
}
