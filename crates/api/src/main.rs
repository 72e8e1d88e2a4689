use anyhow::Context;

use shopfront_infra::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    shopfront_observability::init();

    let config = AppConfig::from_env();
    let app = shopfront_api::app::build_app(&config).await?;

    let listener = tokio::net::TcpListener::bind(&config.http_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.http_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
