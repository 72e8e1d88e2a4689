//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: store selection and the catalog services built on it
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: query parsing and JSON response shapes
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower::ServiceBuilder;

use shopfront_infra::config::AppConfig;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub async fn build_app(config: &AppConfig) -> anyhow::Result<Router> {
    let services = services::build_services(config).await?;
    Ok(build_app_with_services(services))
}

/// Build the router around already-constructed services.
pub fn build_app_with_services(services: services::AppServices) -> Router {
    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::router())
        .layer(Extension(Arc::new(services)))
        .layer(ServiceBuilder::new().layer(axum::middleware::from_fn(middleware::request_context)))
}
