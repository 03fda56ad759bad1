//! Import and export of the ledger in its tabular formats.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Extension, Query},
    http::header,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use stockyard_infra::{ExportError, ImportFormat, StockyardService};

use crate::app::{dto, errors};

const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";
const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

pub fn router() -> Router {
    Router::new()
        .route("/csv", get(export_csv))
        .route("/balances.csv", get(export_balances_csv))
        .route("/xlsx", get(export_xlsx))
}

/// Replace the ledger with the contents of an exported table.
pub async fn import(
    Extension(service): Extension<Arc<StockyardService>>,
    Query(query): Query<dto::ImportQuery>,
    body: Bytes,
) -> axum::response::Response {
    let format = match query.format.as_deref().map(str::parse::<ImportFormat>).transpose() {
        Ok(f) => f,
        Err(e) => return errors::stock_error_to_response(e),
    };

    match service.restore_from_bytes(&body, format) {
        Ok(report) => Json(dto::RestoreResponse {
            records: report.records,
            restored_locations: report.restored_locations,
            skipped_locations: dto::composite_labels(&report.skipped_locations),
            negative_locations: dto::composite_labels(&report.negative_locations),
        })
        .into_response(),
        Err(e) => errors::stock_error_to_response(e),
    }
}

pub async fn export_csv(Extension(service): Extension<Arc<StockyardService>>) -> axum::response::Response {
    attachment(service.export_delimited(), CSV_CONTENT_TYPE, "movimientos.csv")
}

pub async fn export_balances_csv(
    Extension(service): Extension<Arc<StockyardService>>,
) -> axum::response::Response {
    attachment(service.export_balances_delimited(), CSV_CONTENT_TYPE, "stock.csv")
}

pub async fn export_xlsx(Extension(service): Extension<Arc<StockyardService>>) -> axum::response::Response {
    attachment(service.export_workbook(), XLSX_CONTENT_TYPE, "stockyard.xlsx")
}

fn attachment(
    bytes: Result<Vec<u8>, ExportError>,
    content_type: &'static str,
    filename: &'static str,
) -> axum::response::Response {
    match bytes {
        Ok(bytes) => (
            [
                (header::CONTENT_TYPE, content_type.to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{filename}\""),
                ),
            ],
            bytes,
        )
            .into_response(),
        Err(e) => errors::export_error_to_response(e),
    }
}
