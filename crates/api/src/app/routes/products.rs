use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, rejection::JsonRejection},
    http::StatusCode,
    routing::{get, put},
};

use catalog_products::{CandidateProduct, ProductPatch};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route("/:id", put(update_product).delete(delete_product))
}

pub async fn list_products(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.products().list_products().await {
        Ok(products) => dto::envelope(StatusCode::OK, dto::PRODUCTS_FETCHED, products),
        Err(e) => errors::catalog_error_to_response(e),
    }
}

pub async fn create_product(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<Option<CandidateProduct>>, JsonRejection>,
) -> axum::response::Response {
    let input = match dto::decode_body(body) {
        Ok(input) => input,
        Err(resp) => return resp,
    };

    match services.products().create_product(input).await {
        Ok(product) => {
            tracing::info!(product_id = %product.id, "product created");
            dto::envelope(StatusCode::CREATED, dto::PRODUCT_CREATED, product)
        }
        Err(e) => errors::catalog_error_to_response(e),
    }
}

pub async fn update_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Result<Json<Option<ProductPatch>>, JsonRejection>,
) -> axum::response::Response {
    let patch = match dto::decode_body(body) {
        Ok(patch) => patch,
        Err(resp) => return resp,
    };

    match services.products().update_product(&id, patch).await {
        Ok(product) => dto::envelope(StatusCode::OK, dto::PRODUCT_UPDATED, product),
        Err(e) => errors::catalog_error_to_response(e),
    }
}

pub async fn delete_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    match services.products().delete_product(&id).await {
        Ok(product) => {
            tracing::info!(product_id = %product.id, "product deleted");
            dto::envelope(StatusCode::OK, dto::PRODUCT_DELETED, product)
        }
        Err(e) => errors::catalog_error_to_response(e),
    }
}
