use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_products))
        .route("/:code", get(get_product))
}

pub async fn list_products(
    Extension(services): Extension<Arc<AppServices>>,
    params: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> axum::response::Response {
    let Query(params) = match params {
        Ok(p) => p,
        Err(e) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_request", e.body_text()),
    };

    let filters = match dto::ListProductsQuery::from_pairs(params).into_filters() {
        Ok(f) => f,
        Err(e) => return errors::catalog_error_to_response(e),
    };

    match services.list_products(&filters).await {
        Ok(page) => Json(dto::ProductListResponse::from(page)).into_response(),
        Err(e) => errors::catalog_error_to_response(e),
    }
}

pub async fn get_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(code): Path<String>,
) -> axum::response::Response {
    match services.product_detail(&code).await {
        Ok(detail) => Json(dto::ProductDetailResponse::from(detail)).into_response(),
        Err(e) => errors::catalog_error_to_response(e),
    }
}
