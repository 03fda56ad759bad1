use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use stockyard_core::Location;
use stockyard_infra::StockyardService;

use crate::app::{dto, errors};

/// Entries returned by `/history` when no limit is given.
const DEFAULT_HISTORY_LIMIT: usize = 50;

pub fn router() -> Router {
    Router::new()
        .route("/", get(summary))
        .route("/:site/:lot", get(balance))
}

pub async fn summary(Extension(service): Extension<Arc<StockyardService>>) -> impl IntoResponse {
    Json(service.summary())
}

pub async fn balance(
    Extension(service): Extension<Arc<StockyardService>>,
    Path((site, lot)): Path<(String, String)>,
) -> axum::response::Response {
    match service.current_balance(&Location::new(site, lot)) {
        Ok(balance) => Json(balance).into_response(),
        Err(e) => errors::stock_error_to_response(e),
    }
}

pub async fn history(
    Extension(service): Extension<Arc<StockyardService>>,
    Query(query): Query<dto::HistoryQuery>,
) -> impl IntoResponse {
    let limit = query.limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
    let entries = service
        .tail(limit)
        .iter()
        .rev()
        .map(dto::EntryResponse::from)
        .collect();

    Json(dto::HistoryResponse {
        total: service.history_len(),
        entries,
    })
}
