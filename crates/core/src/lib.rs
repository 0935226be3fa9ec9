//! `catalog-core` — shared catalog building blocks.
//!
//! Identifiers and the error taxonomy used by every other crate (no IO).

pub mod error;
pub mod id;

pub use error::{CatalogError, CatalogResult, StoreOperation};
pub use id::ProductId;
