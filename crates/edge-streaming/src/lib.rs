//! Streaming primitives for shell-first SSR.
//!
//! This crate enforces shell-first streaming patterns:
//! - `StreamingSink` - Platform-controlled streaming
//! - `Shell` / `HeadContent` - Document shell split around the streamed body

mod shell;
mod sink;

pub use shell::*;
pub use sink::*;
