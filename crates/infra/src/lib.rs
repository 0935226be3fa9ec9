//! Infrastructure layer: product stores and configuration.

pub mod config;
pub mod store;

pub use config::{AppConfig, ConfigError};
pub use store::{InMemoryProductStore, PostgresProductStore};
