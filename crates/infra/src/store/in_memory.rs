use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;

use catalog_core::ProductId;
use catalog_products::{NewProduct, Product, ProductPatch, ProductStore, StoreError};

/// In-memory product store for tests/dev.
///
/// Records keep insertion order, which is the natural order `fetch_all`
/// returns. Writers are serialized by the lock, so an update and a delete of
/// the same record never interleave.
#[derive(Debug)]
pub struct InMemoryProductStore {
    inner: RwLock<Vec<Product>>,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Vec::new()),
        }
    }

    /// Number of stored records. Still readable after a writer panicked.
    pub fn len(&self) -> usize {
        match self.inner.read() {
            Ok(records) => records.len(),
            Err(poisoned) => {
                tracing::warn!("in-memory store lock poisoned");
                poisoned.into_inner().len()
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryProductStore {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned() -> StoreError {
    StoreError::Unavailable("in-memory store lock poisoned".to_string())
}

#[async_trait]
impl ProductStore for InMemoryProductStore {
    async fn insert(&self, product: NewProduct) -> Result<Product, StoreError> {
        let mut records = self.inner.write().map_err(|_| poisoned())?;

        let mut id = ProductId::generate();
        while records.iter().any(|p| p.id == id) {
            id = ProductId::generate();
        }

        let stored = product.into_product(id, Utc::now());
        records.push(stored.clone());
        tracing::debug!(product_id = %stored.id, "product inserted");
        Ok(stored)
    }

    async fn fetch_all(&self) -> Result<Vec<Product>, StoreError> {
        let records = self.inner.read().map_err(|_| poisoned())?;
        Ok(records.clone())
    }

    async fn update_by_id(&self, id: &ProductId, patch: ProductPatch) -> Result<Product, StoreError> {
        let mut records = self.inner.write().map_err(|_| poisoned())?;
        let product = records
            .iter_mut()
            .find(|p| p.id == *id)
            .ok_or(StoreError::NotFound)?;

        patch.apply_to(product, Utc::now());
        Ok(product.clone())
    }

    async fn delete_by_id(&self, id: &ProductId) -> Result<Product, StoreError> {
        let mut records = self.inner.write().map_err(|_| poisoned())?;
        let pos = records
            .iter()
            .position(|p| p.id == *id)
            .ok_or(StoreError::NotFound)?;

        Ok(records.remove(pos))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn new_product(name: &str, price: f64) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            price,
            image: format!("http://img/{name}.png"),
        }
    }

    #[tokio::test]
    async fn insert_assigns_id_and_timestamps() {
        let store = InMemoryProductStore::new();
        let p = store.insert(new_product("Chair", 49.99)).await.unwrap();

        assert!(ProductId::is_well_formed(&p.id.to_string()));
        assert_eq!(p.created_at, p.updated_at);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn fetch_all_keeps_insertion_order() {
        let store = InMemoryProductStore::new();
        let a = store.insert(new_product("A", 1.0)).await.unwrap();
        let b = store.insert(new_product("B", 2.0)).await.unwrap();
        let c = store.insert(new_product("C", 3.0)).await.unwrap();

        let ids: Vec<_> = store.fetch_all().await.unwrap().into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![a.id, b.id, c.id]);
    }

    #[tokio::test]
    async fn update_returns_post_update_state() {
        let store = InMemoryProductStore::new();
        let p = store.insert(new_product("Chair", 49.99)).await.unwrap();

        let patch = ProductPatch {
            price: Some(59.99),
            ..Default::default()
        };
        let updated = store.update_by_id(&p.id, patch).await.unwrap();

        assert_eq!(updated.price, 59.99);
        assert_eq!(updated.name, "Chair");
        assert!(updated.updated_at >= p.updated_at);
        assert_eq!(updated.created_at, p.created_at);

        let listed = store.fetch_all().await.unwrap();
        assert_eq!(listed, vec![updated]);
    }

    #[tokio::test]
    async fn delete_returns_removed_record() {
        let store = InMemoryProductStore::new();
        let p = store.insert(new_product("Chair", 49.99)).await.unwrap();

        let removed = store.delete_by_id(&p.id).await.unwrap();
        assert_eq!(removed, p);
        assert!(store.is_empty());

        assert_eq!(store.delete_by_id(&p.id).await.unwrap_err(), StoreError::NotFound);
    }

    #[tokio::test]
    async fn unknown_ids_are_not_found() {
        let store = InMemoryProductStore::new();
        let id = ProductId::generate();

        assert_eq!(
            store.update_by_id(&id, ProductPatch::default()).await.unwrap_err(),
            StoreError::NotFound
        );
        assert_eq!(store.delete_by_id(&id).await.unwrap_err(), StoreError::NotFound);
    }

    #[tokio::test]
    async fn concurrent_inserts_all_land_with_unique_ids() {
        let store = Arc::new(InMemoryProductStore::new());

        let mut handles = Vec::new();
        for i in 0..32 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.insert(new_product(&format!("p{i}"), 1.0 + i as f64)).await
            }));
        }
        for h in handles {
            h.await.unwrap().unwrap();
        }

        let all = store.fetch_all().await.unwrap();
        let mut ids: Vec<_> = all.iter().map(|p| p.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 32);
    }

    #[tokio::test]
    async fn poisoned_lock_keeps_len_but_fails_operations() {
        let store = Arc::new(InMemoryProductStore::new());
        store.insert(new_product("Chair", 49.99)).await.unwrap();

        let writer = store.clone();
        let panicked = std::thread::spawn(move || {
            let _guard = writer.inner.write().unwrap();
            panic!("writer died holding the lock");
        })
        .join();
        assert!(panicked.is_err());

        assert_eq!(store.len(), 1);
        assert!(!store.is_empty());
        assert!(matches!(store.fetch_all().await, Err(StoreError::Unavailable(_))));
    }
}
