use std::sync::Arc;

use anyhow::Context;

use interviewselect_api::app::{self, services::AppServices};
use interviewselect_infra::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    interviewselect_observability::init();

    let config = AppConfig::from_env().context("invalid configuration")?;
    if config.identity.app_client_id.is_none() {
        tracing::warn!("COGNITO_APP_CLIENT_ID not set; registration will fail");
    }

    let services = AppServices::from_config(&config)
        .await
        .context("failed to initialize services")?;
    let app = app::build_app(Arc::new(services));

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!(addr = %listener.local_addr()?, persistent = config.use_persistent_stores, "listening");

    axum::serve(listener, app).await?;
    Ok(())
}
