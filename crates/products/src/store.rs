//! Storage boundary for products.
//!
//! The store owns durability, identifier assignment, timestamps and the
//! consistency of individual record operations. Implementations live in
//! `catalog-infra`.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use catalog_core::ProductId;

use crate::product::{NewProduct, Product, ProductPatch};

/// Store operation error.
///
/// These never cross the manager boundary; the manager re-expresses them as
/// `CatalogError` kinds.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// No record has the requested identifier.
    #[error("record not found")]
    NotFound,

    /// Connectivity, timeout, or driver failure.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Persistent product collection.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Persist a validated product, assigning its id and timestamps.
    async fn insert(&self, product: NewProduct) -> Result<Product, StoreError>;

    /// Every stored product, in the store's natural order.
    async fn fetch_all(&self) -> Result<Vec<Product>, StoreError>;

    /// Apply `patch` and return the record as it is after the update.
    async fn update_by_id(&self, id: &ProductId, patch: ProductPatch) -> Result<Product, StoreError>;

    /// Remove the record and return its last known state.
    async fn delete_by_id(&self, id: &ProductId) -> Result<Product, StoreError>;

    /// Whether `id` has the syntax this store's identifiers use.
    fn is_valid_identifier_format(&self, id: &str) -> bool {
        ProductId::is_well_formed(id)
    }
}

#[async_trait]
impl<S> ProductStore for Arc<S>
where
    S: ProductStore + ?Sized,
{
    async fn insert(&self, product: NewProduct) -> Result<Product, StoreError> {
        (**self).insert(product).await
    }

    async fn fetch_all(&self) -> Result<Vec<Product>, StoreError> {
        (**self).fetch_all().await
    }

    async fn update_by_id(&self, id: &ProductId, patch: ProductPatch) -> Result<Product, StoreError> {
        (**self).update_by_id(id, patch).await
    }

    async fn delete_by_id(&self, id: &ProductId) -> Result<Product, StoreError> {
        (**self).delete_by_id(id).await
    }

    fn is_valid_identifier_format(&self, id: &str) -> bool {
        (**self).is_valid_identifier_format(id)
    }
}
