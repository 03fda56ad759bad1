use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};

use stockyard_infra::StockyardService;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// Zero every balance and clear the history.
pub async fn reset(Extension(service): Extension<Arc<StockyardService>>) -> impl IntoResponse {
    service.reset();
    Json(serde_json::json!({
        "total_stock": service.total_stock(),
        "history_len": service.history_len(),
    }))
}
