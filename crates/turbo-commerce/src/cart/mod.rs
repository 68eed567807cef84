//! Shopping bag module.
//!
//! Contains the `CartStore` seam and the session-held `Bag`.

mod bag;

pub use bag::{Bag, BagItem, CartStore};
