//! Postgres-backed product store.
//!
//! ## Error Mapping
//!
//! | Outcome | StoreError |
//! |---------|------------|
//! | `UPDATE`/`DELETE ... RETURNING` yields no row | `NotFound` |
//! | Database error (any SQLSTATE) | `Unavailable` |
//! | Pool closed, IO, TLS, timeout | `Unavailable` |
//! | Row with an id that does not parse | `Unavailable` |
//!
//! Timestamps always come from the database clock (`NOW()`), on insert and on
//! update alike.
//!
//! ## Thread Safety
//!
//! `PostgresProductStore` is `Send + Sync`; every operation is a single
//! statement on the SQLx pool, so per-record consistency comes from Postgres
//! statement atomicity.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use tracing::{Span, instrument};

use catalog_core::ProductId;
use catalog_products::{NewProduct, Product, ProductPatch, ProductStore, StoreError};

const CREATE_PRODUCTS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS products (
        id          TEXT PRIMARY KEY CHECK (char_length(id) = 24),
        name        TEXT NOT NULL,
        price       DOUBLE PRECISION NOT NULL,
        image       TEXT NOT NULL,
        created_at  TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at  TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
"#;

#[derive(Debug, Clone)]
pub struct PostgresProductStore {
    pool: Arc<PgPool>,
}

impl PostgresProductStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Open a pool against `database_url`.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPool::connect(database_url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;
        Ok(Self::new(pool))
    }

    /// Create the `products` table if it does not exist yet.
    #[instrument(skip(self), err)]
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(CREATE_PRODUCTS_TABLE)
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("ensure_schema", e))?;
        Ok(())
    }

    /// Close every pooled connection. Pending operations fail afterwards.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl ProductStore for PostgresProductStore {
    #[instrument(skip(self, product), fields(product_id = tracing::field::Empty), err)]
    async fn insert(&self, product: NewProduct) -> Result<Product, StoreError> {
        let id = ProductId::generate();
        Span::current().record("product_id", tracing::field::display(&id));

        let row = sqlx::query(
            r#"
            INSERT INTO products (id, name, price, image, created_at, updated_at)
            VALUES ($1, $2, $3, $4, NOW(), NOW())
            RETURNING id, name, price, image, created_at, updated_at
            "#,
        )
        .bind(id.to_string())
        .bind(&product.name)
        .bind(product.price)
        .bind(&product.image)
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert", e))?;

        ProductRow::from_pg_row(&row)?.try_into()
    }

    #[instrument(skip(self), fields(count = tracing::field::Empty), err)]
    async fn fetch_all(&self) -> Result<Vec<Product>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, price, image, created_at, updated_at
            FROM products
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("fetch_all", e))?;

        let mut products = Vec::with_capacity(rows.len());
        for row in rows {
            products.push(ProductRow::from_pg_row(&row)?.try_into()?);
        }

        Span::current().record("count", products.len());
        Ok(products)
    }

    #[instrument(skip(self, patch), fields(product_id = %id), err)]
    async fn update_by_id(&self, id: &ProductId, patch: ProductPatch) -> Result<Product, StoreError> {
        let row = sqlx::query(
            r#"
            UPDATE products SET
                name = COALESCE($2, name),
                price = COALESCE($3, price),
                image = COALESCE($4, image),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, price, image, created_at, updated_at
            "#,
        )
        .bind(id.to_string())
        .bind(patch.name)
        .bind(patch.price)
        .bind(patch.image)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("update_by_id", e))?
        .ok_or(StoreError::NotFound)?;

        ProductRow::from_pg_row(&row)?.try_into()
    }

    #[instrument(skip(self), fields(product_id = %id), err)]
    async fn delete_by_id(&self, id: &ProductId) -> Result<Product, StoreError> {
        let row = sqlx::query(
            r#"
            DELETE FROM products
            WHERE id = $1
            RETURNING id, name, price, image, created_at, updated_at
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("delete_by_id", e))?
        .ok_or(StoreError::NotFound)?;

        ProductRow::from_pg_row(&row)?.try_into()
    }
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            let code = db_err.code().map(|c| c.into_owned()).unwrap_or_default();
            StoreError::Unavailable(format!(
                "database error in {} (sqlstate {}): {}",
                operation,
                code,
                db_err.message()
            ))
        }
        sqlx::Error::PoolClosed => {
            StoreError::Unavailable(format!("connection pool closed in {}", operation))
        }
        sqlx::Error::PoolTimedOut => {
            StoreError::Unavailable(format!("timed out acquiring a connection in {}", operation))
        }
        _ => StoreError::Unavailable(format!("sqlx error in {}: {}", operation, err)),
    }
}

// SQLx row types

#[derive(Debug)]
struct ProductRow {
    id: String,
    name: String,
    price: f64,
    image: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ProductRow {
    fn from_pg_row(row: &sqlx::postgres::PgRow) -> Result<Self, StoreError> {
        let read = || -> Result<Self, sqlx::Error> {
            Ok(ProductRow {
                id: row.try_get("id")?,
                name: row.try_get("name")?,
                price: row.try_get("price")?,
                image: row.try_get("image")?,
                created_at: row.try_get("created_at")?,
                updated_at: row.try_get("updated_at")?,
            })
        };
        read().map_err(|e| StoreError::Unavailable(format!("failed to decode product row: {}", e)))
    }
}

impl TryFrom<ProductRow> for Product {
    type Error = StoreError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let id: ProductId = row
            .id
            .trim()
            .parse()
            .map_err(|_| StoreError::Unavailable(format!("stored product has malformed id {:?}", row.id)))?;

        Ok(Product {
            id,
            name: row.name,
            price: row.price,
            image: row.image,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
