use std::sync::Arc;

use anyhow::Context;

use catalog_infra::{AppConfig, InMemoryProductStore, PostgresProductStore};
use catalog_products::{ProductManager, ProductStore};

/// Product manager over a type-erased store handle.
pub type ProductService = ProductManager<Arc<dyn ProductStore>>;

/// Wired services plus the concrete store they run on.
///
/// The store variant is kept so bootstrap can tear it down; request handlers
/// only ever see `products()`.
#[derive(Clone)]
pub enum AppServices {
    InMemory {
        products: ProductService,
        store: Arc<InMemoryProductStore>,
    },
    Persistent {
        products: ProductService,
        store: Arc<PostgresProductStore>,
    },
}

impl AppServices {
    pub fn in_memory(store: Arc<InMemoryProductStore>) -> Self {
        let erased: Arc<dyn ProductStore> = store.clone();
        AppServices::InMemory {
            products: ProductManager::new(erased),
            store,
        }
    }

    pub fn persistent(store: Arc<PostgresProductStore>) -> Self {
        let erased: Arc<dyn ProductStore> = store.clone();
        AppServices::Persistent {
            products: ProductManager::new(erased),
            store,
        }
    }

    pub fn products(&self) -> &ProductService {
        match self {
            AppServices::InMemory { products, .. } => products,
            AppServices::Persistent { products, .. } => products,
        }
    }

    pub fn backend_name(&self) -> &'static str {
        match self {
            AppServices::InMemory { .. } => "in-memory",
            AppServices::Persistent { .. } => "postgres",
        }
    }

    /// Release store resources (closes the connection pool when persistent).
    pub async fn shutdown(&self) {
        match self {
            AppServices::InMemory { store, .. } => {
                tracing::info!(products = store.len(), "in-memory store discarded");
            }
            AppServices::Persistent { store, .. } => {
                store.close().await;
                tracing::info!("postgres pool closed");
            }
        }
    }
}

pub fn build_in_memory_services() -> AppServices {
    AppServices::in_memory(Arc::new(InMemoryProductStore::new()))
}

pub async fn build_persistent_services(database_url: &str) -> anyhow::Result<AppServices> {
    let store = PostgresProductStore::connect(database_url)
        .await
        .context("failed to connect to Postgres")?;
    store
        .ensure_schema()
        .await
        .context("failed to prepare products table")?;

    Ok(AppServices::persistent(Arc::new(store)))
}

/// Pick the store from configuration, as bootstrap does.
pub async fn build_services(config: &AppConfig) -> anyhow::Result<AppServices> {
    let services = match (config.use_persistent_stores, config.database_url.as_deref()) {
        (true, Some(url)) => build_persistent_services(url).await?,
        (true, None) => anyhow::bail!("DATABASE_URL must be set when USE_PERSISTENT_STORES=true"),
        (false, _) => build_in_memory_services(),
    };

    tracing::info!(backend = services.backend_name(), "product store ready");
    Ok(services)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn in_memory_config_builds_in_memory_services() {
        let services = build_services(&AppConfig::in_memory()).await.unwrap();
        assert_eq!(services.backend_name(), "in-memory");
        assert!(services.products().list_products().await.unwrap().is_empty());
        services.shutdown().await;
    }

    #[tokio::test]
    async fn persistent_without_url_is_rejected() {
        let config = AppConfig {
            use_persistent_stores: true,
            database_url: None,
            ..AppConfig::in_memory()
        };
        assert!(build_services(&config).await.is_err());
    }
}
