//! Outbound data access for storefront workloads.
//!
//! This crate provides:
//! - `FetchClient` - JSON fetches with request-id propagation and bearer auth
//! - `FetchRequest` / `FetchResponse` - Transport-neutral request and response
//! - `Transport` - The seam to the host's outbound HTTP (`SpinTransport` on wasm32)

mod client;
mod encode;
mod transport;

pub use client::*;
pub use encode::*;
pub use transport::*;
