//! Upstream data sources for the product page.

mod stripe;

pub use stripe::*;
