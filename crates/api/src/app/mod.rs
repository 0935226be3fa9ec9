//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: store selection and manager wiring
//! - `routes/`: HTTP routes + handlers
//! - `dto.rs`: response envelope and body decoding
//! - `errors.rs`: error kind → status/envelope mapping

use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

pub use services::AppServices;

/// Build the full HTTP router over already-wired services.
pub fn build_app(services: Arc<AppServices>) -> Router {
    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::router())
        .fallback(routes::system::not_found)
        .layer(Extension(services))
        .layer(ServiceBuilder::new().layer(axum::middleware::from_fn(middleware::request_trace_middleware)))
}
