use axum::{
    routing::{get, post},
    Router,
};

pub mod movements;
pub mod stock;
pub mod system;
pub mod transfer;

/// Router for every ledger endpoint.
pub fn router() -> Router {
    Router::new()
        .nest("/stock", stock::router())
        .nest("/movements", movements::router())
        .route("/history", get(stock::history))
        .route("/reset", post(system::reset))
        .route("/import", post(transfer::import))
        .nest("/export", transfer::router())
}
