use axum::http::StatusCode;
use axum::response::IntoResponse;

use catalog_core::CatalogError;

use crate::app::dto::ApiResponse;

pub fn status_for(err: &CatalogError) -> StatusCode {
    match err {
        CatalogError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        CatalogError::InvalidIdentifier(_) => StatusCode::BAD_REQUEST,
        CatalogError::NotFound(_) => StatusCode::NOT_FOUND,
        CatalogError::StorageUnavailable { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Render a manager failure. Only the error's `Display` text reaches the body;
/// storage details were already logged where the failure was mapped.
pub fn catalog_error_to_response(err: CatalogError) -> axum::response::Response {
    json_error(status_for(&err), err.to_string())
}

pub fn json_error(status: StatusCode, message: impl Into<String>) -> axum::response::Response {
    (status, axum::Json(ApiResponse::error(message))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_core::StoreOperation;

    async fn body_json(resp: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn kinds_map_to_statuses() {
        assert_eq!(status_for(&CatalogError::invalid_input("x")), StatusCode::BAD_REQUEST);
        assert_eq!(status_for(&CatalogError::invalid_identifier("x")), StatusCode::BAD_REQUEST);
        assert_eq!(status_for(&CatalogError::not_found("x")), StatusCode::NOT_FOUND);
        assert_eq!(
            status_for(&CatalogError::storage_unavailable(StoreOperation::List, "x")),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn storage_failure_body_is_generic() {
        let resp = catalog_error_to_response(CatalogError::storage_unavailable(
            StoreOperation::Update,
            "database error in update_by_id (sqlstate 57P01): terminating connection",
        ));
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(resp).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Failed to update product");
        assert!(body.get("data").is_none());
        assert!(!body.to_string().contains("sqlstate"));
    }
}
