//! Products module.
//!
//! The product record, its validation rules, the storage contract, and the
//! manager that ties them together. No HTTP and no concrete storage here.

pub mod manager;
pub mod product;
pub mod store;

pub use manager::ProductManager;
pub use product::{ALL_FIELDS_REQUIRED, CandidateProduct, NewProduct, Product, ProductPatch};
pub use store::{ProductStore, StoreError};
