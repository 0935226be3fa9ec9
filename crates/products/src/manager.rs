//! Product resource manager.
//!
//! The manager is the layer the HTTP routes delegate to. It validates input,
//! makes exactly one store call per operation, and translates the store's
//! outcome into a `CatalogError` kind. It holds nothing but the store handle,
//! so concurrent calls never interfere at this layer.

use tracing::instrument;

use catalog_core::{CatalogError, CatalogResult, ProductId, StoreOperation};

use crate::product::{CandidateProduct, NewProduct, Product, ProductPatch};
use crate::store::{ProductStore, StoreError};

pub const INVALID_PRODUCT_ID: &str = "Invalid product ID";
pub const PRODUCT_NOT_FOUND: &str = "Product not found";
pub const ID_AND_DATA_REQUIRED: &str = "Product ID and data are required";
pub const ID_REQUIRED: &str = "Product ID is required";

#[derive(Debug, Clone)]
pub struct ProductManager<S> {
    store: S,
}

impl<S> ProductManager<S>
where
    S: ProductStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Fetch the full collection in the store's natural order.
    #[instrument(level = "debug", skip(self))]
    pub async fn list_products(&self) -> CatalogResult<Vec<Product>> {
        self.store
            .fetch_all()
            .await
            .map_err(|e| map_store_error(StoreOperation::List, e))
    }

    /// Validate `input` and persist it.
    ///
    /// Fails with `InvalidInput` (and never touches the store) unless the
    /// input is present and `name`, `price` and `image` are all truthy.
    #[instrument(level = "debug", skip(self, input))]
    pub async fn create_product(&self, input: Option<CandidateProduct>) -> CatalogResult<Product> {
        let candidate = input.ok_or_else(|| CatalogError::invalid_input(crate::ALL_FIELDS_REQUIRED))?;
        let new = NewProduct::try_from(candidate)?;

        self.store
            .insert(new)
            .await
            .map_err(|e| map_store_error(StoreOperation::Create, e))
    }

    /// Apply `patch` to the product identified by `id`.
    ///
    /// The identifier format is checked first, before anything else, so a
    /// malformed id is reported as `InvalidIdentifier` whatever the body.
    #[instrument(level = "debug", skip(self, patch))]
    pub async fn update_product(&self, id: &str, patch: Option<ProductPatch>) -> CatalogResult<Product> {
        let product_id = self.parse_id(id)?;

        let patch = match patch {
            Some(p) if !id.is_empty() && !p.is_empty() => p,
            _ => return Err(CatalogError::invalid_input(ID_AND_DATA_REQUIRED)),
        };

        self.store
            .update_by_id(&product_id, patch)
            .await
            .map_err(|e| map_store_error(StoreOperation::Update, e))
    }

    /// Remove the product identified by `id`, returning what was removed.
    #[instrument(level = "debug", skip(self))]
    pub async fn delete_product(&self, id: &str) -> CatalogResult<Product> {
        let product_id = self.parse_id(id)?;

        if id.is_empty() {
            return Err(CatalogError::invalid_input(ID_REQUIRED));
        }

        self.store
            .delete_by_id(&product_id)
            .await
            .map_err(|e| map_store_error(StoreOperation::Delete, e))
    }

    fn parse_id(&self, id: &str) -> CatalogResult<ProductId> {
        if !self.store.is_valid_identifier_format(id) {
            return Err(CatalogError::invalid_identifier(INVALID_PRODUCT_ID));
        }
        id.parse()
            .map_err(|_| CatalogError::invalid_identifier(INVALID_PRODUCT_ID))
    }
}

fn map_store_error(operation: StoreOperation, err: StoreError) -> CatalogError {
    match (operation, err) {
        (StoreOperation::Update | StoreOperation::Delete, StoreError::NotFound) => {
            CatalogError::not_found(PRODUCT_NOT_FOUND)
        }
        (_, err) => {
            let detail = err.to_string();
            tracing::error!(operation = %operation, detail = %detail, "store operation failed");
            CatalogError::storage_unavailable(operation, detail)
        }
    }
}
