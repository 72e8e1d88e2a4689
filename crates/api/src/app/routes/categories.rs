use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new().route("/", get(list_categories).post(create_category))
}

pub async fn list_categories(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match services.list_categories().await {
        Ok(categories) => Json(
            categories
                .into_iter()
                .map(dto::CategoryResponse::from)
                .collect::<Vec<_>>(),
        )
        .into_response(),
        Err(e) => errors::catalog_error_to_response(e),
    }
}

pub async fn create_category(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::CreateCategoryRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(e) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_request", e.body_text()),
    };

    match services.create_category(body.into()).await {
        Ok(category) => (StatusCode::CREATED, Json(dto::CategoryResponse::from(category))).into_response(),
        Err(e) => errors::catalog_error_to_response(e),
    }
}
