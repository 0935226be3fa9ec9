//! `ProductStore` implementations.
//!
//! - `in_memory`: process-local store for dev and tests
//! - `postgres`: durable store over a SQLx connection pool

pub mod in_memory;
pub mod postgres;

pub use in_memory::InMemoryProductStore;
pub use postgres::PostgresProductStore;
