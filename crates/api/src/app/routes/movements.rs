use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};

use stockyard_core::{Location, StockResult};
use stockyard_infra::StockyardService;
use stockyard_inventory::LedgerEntry;

use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/inbound", post(inbound))
        .route("/outbound", post(outbound))
        .route("/outbound/units", post(outbound_units))
}

pub async fn inbound(
    Extension(service): Extension<Arc<StockyardService>>,
    body: Result<Json<dto::MovementRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => return errors::json_rejection_to_response(rejection),
    };
    let material = dto::parse_material(body.material.as_deref());
    created(
        dto::parse_quantity("quantity", &body.quantity).and_then(|quantity| {
            service.record_inbound(Location::new(body.site, body.lot), quantity, material)
        }),
    )
}

pub async fn outbound(
    Extension(service): Extension<Arc<StockyardService>>,
    body: Result<Json<dto::MovementRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => return errors::json_rejection_to_response(rejection),
    };
    let material = dto::parse_material(body.material.as_deref());
    created(
        dto::parse_quantity("quantity", &body.quantity).and_then(|quantity| {
            service.record_outbound(Location::new(body.site, body.lot), quantity, material)
        }),
    )
}

/// Outbound expressed as `unit_count` loads of `unit_weight` each.
pub async fn outbound_units(
    Extension(service): Extension<Arc<StockyardService>>,
    body: Result<Json<dto::UnitOutboundRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => return errors::json_rejection_to_response(rejection),
    };
    let material = dto::parse_material(body.material.as_deref());
    let amounts = dto::parse_quantity("unit_weight", &body.unit_weight)
        .and_then(|weight| Ok((weight, dto::parse_count("unit_count", &body.unit_count)?)));
    created(amounts.and_then(|(unit_weight, unit_count)| {
        service.outbound_from_units(Location::new(body.site, body.lot), unit_weight, unit_count, material)
    }))
}

fn created(result: StockResult<LedgerEntry>) -> axum::response::Response {
    match result {
        Ok(entry) => (StatusCode::CREATED, Json(dto::EntryResponse::from(&entry))).into_response(),
        Err(e) => errors::stock_error_to_response(e),
    }
}
