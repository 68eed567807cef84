//! Core request abstractions for the storefront edge workloads.
//!
//! This crate provides the fundamental types shared by every workload:
//! - `WorkloadManifest` / `RouteConfig` - Routes a workload serves
//! - `RequestContext` - Method, path, extracted params and headers
//! - `TimingContext` - Request lifecycle marks for logging

mod config;
mod context;
mod lifecycle;
mod workload;

pub use config::*;
pub use context::*;
pub use lifecycle::*;
pub use workload::*;
