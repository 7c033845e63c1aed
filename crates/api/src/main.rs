use std::sync::Arc;

use anyhow::Context;

use cyclecount_infra::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    cyclecount_observability::init();

    let config = Config::from_env().context("invalid configuration")?;
    let services = cyclecount_api::app::services::build_services(&config.store)
        .context("failed to set up store")?;

    // Tables may also be created on demand via /init.
    if let Err(e) = services.initialize().await {
        tracing::warn!(error = %e, "schema initialization failed at startup");
    }

    let app = cyclecount_api::app::build_app(Arc::new(services), config.max_upload_bytes);

    let addr = config.server_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
