//! Domain types.

pub mod product;

pub use product::{Product, INITIAL_VERSION};
