//! Type-safe Key-Value storage for TurboCommerce.
//!
//! Wraps Spin's Key-Value Store with automatic JSON serialization. Off
//! wasm32 the same API is backed by an in-process map, so code using it can
//! be tested natively.
//!
//! # Example
//!
//! ```rust
//! use turbo_cache::{Session, SessionId};
//! use serde::{Serialize, Deserialize};
//!
//! #[derive(Serialize, Deserialize, Default, Clone)]
//! struct Shopper {
//!     visits: u32,
//! }
//!
//! let sessions = Session::<Shopper>::new().unwrap();
//! let id = SessionId::generate();
//! let shopper = sessions.update(&id, |s| s.visits += 1).unwrap();
//! assert_eq!(shopper.visits, 1);
//! ```

mod error;
mod kv;
mod session;

pub use error::CacheError;
pub use kv::Cache;
pub use session::{Session, SessionData, SessionId};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{Cache, CacheError, Session, SessionId};
}
