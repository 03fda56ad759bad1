//! HTTP API application wiring (Axum router + shared ledger service).
//!
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: request/response DTOs
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower::ServiceBuilder;

use stockyard_infra::StockyardService;

pub mod dto;
pub mod errors;
pub mod routes;

/// Build the full HTTP router around one ledger service (used by `main.rs`).
pub fn build_app(service: StockyardService) -> Router {
    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::router())
        .layer(ServiceBuilder::new().layer(Extension(Arc::new(service))))
}
