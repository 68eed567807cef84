//! Structured request logging for storefront workloads.
//!
//! This crate provides:
//! - `StructuredLogger` - Request-scoped logger (JSON or human output)
//! - `LogBuilder` - Fluent structured fields
//! - `LogEntry` / `LogLevel` / `LogFormat`

mod logging;

pub use logging::*;

// Re-export RequestId from edge-core for convenience
pub use edge_core::RequestId;
