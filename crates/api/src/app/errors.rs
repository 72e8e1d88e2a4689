use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use shopfront_catalog::CatalogError;

pub fn catalog_error_to_response(err: CatalogError) -> axum::response::Response {
    let message = err.to_string();
    if err.is_client_error() {
        tracing::debug!("rejected request: {message}");
    }
    match err {
        CatalogError::InvalidPagination { .. } => {
            json_error(StatusCode::BAD_REQUEST, "invalid_pagination", message)
        }
        CatalogError::InvalidPriceFilter(_) => {
            json_error(StatusCode::BAD_REQUEST, "invalid_price_filter", message)
        }
        CatalogError::InvalidCategory(_) => json_error(StatusCode::BAD_REQUEST, "invalid_category", message),
        CatalogError::ProductNotFound(_) => json_error(StatusCode::NOT_FOUND, "product_not_found", message),
        CatalogError::CategoryCodeExists(_) => {
            json_error(StatusCode::CONFLICT, "category_code_exists", message)
        }
        // Store details are logged where the failure happened; callers get a generic message.
        CatalogError::InternalQueryFailure(_) => json_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal_error",
            "failed to query the catalog",
        ),
    }
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
