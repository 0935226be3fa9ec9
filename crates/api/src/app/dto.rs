use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use crate::app::errors;

pub const PRODUCTS_FETCHED: &str = "Products fetched successfully";
pub const PRODUCT_CREATED: &str = "Product created successfully";
pub const PRODUCT_UPDATED: &str = "Product updated successfully";
pub const PRODUCT_DELETED: &str = "Product deleted successfully";

/// Uniform response envelope: `{ success, message, data? }`.
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
        }
    }
}

pub fn envelope<T: Serialize>(
    status: StatusCode,
    message: &'static str,
    data: T,
) -> axum::response::Response {
    (status, Json(ApiResponse::ok(message, data))).into_response()
}

/// A body that is missing or does not decode into `T` is treated as no body
/// at all; the manager then reports the missing input. Any other rejection
/// (oversized or unreadable payload) is answered with its own status.
pub fn decode_body<T>(
    body: Result<Json<Option<T>>, JsonRejection>,
) -> Result<Option<T>, axum::response::Response> {
    match body {
        Ok(Json(value)) => Ok(value),
        Err(
            rejection @ (JsonRejection::JsonDataError(_)
            | JsonRejection::JsonSyntaxError(_)
            | JsonRejection::MissingJsonContentType(_)),
        ) => {
            tracing::debug!(reason = %rejection.body_text(), "request body rejected");
            Ok(None)
        }
        Err(rejection) => {
            tracing::warn!(status = %rejection.status(), reason = %rejection.body_text(), "request body unreadable");
            Err(errors::json_error(rejection.status(), rejection.body_text()))
        }
    }
}
