use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use stockyard_core::StockError;
use stockyard_infra::ExportError;

pub fn stock_error_to_response(err: StockError) -> axum::response::Response {
    let status = match &err {
        StockError::InvalidLocation { .. }
        | StockError::InvalidQuantity(_)
        | StockError::MalformedImport(_) => StatusCode::BAD_REQUEST,
        StockError::InsufficientStock { .. } => StatusCode::CONFLICT,
        StockError::ImportIo(_) => StatusCode::UNPROCESSABLE_ENTITY,
    };
    json_error(status, err.code(), err.to_string())
}

pub fn json_rejection_to_response(rejection: JsonRejection) -> axum::response::Response {
    json_error(StatusCode::BAD_REQUEST, "invalid_request", rejection.body_text())
}

pub fn export_error_to_response(err: ExportError) -> axum::response::Response {
    tracing::error!(error = %err, "export failed");
    json_error(StatusCode::INTERNAL_SERVER_ERROR, "export_failed", err.to_string())
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
