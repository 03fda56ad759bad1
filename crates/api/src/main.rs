use anyhow::Context;

use stockyard_infra::{StockyardConfig, StockyardService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    stockyard_observability::init();

    let config = StockyardConfig::from_env().context("invalid stockyard configuration")?;
    let service = StockyardService::from_config(&config).context("failed to build ledger")?;
    let app = stockyard_api::app::build_app(service);

    let listener = tokio::net::TcpListener::bind(config.bind_addr.as_str())
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!(
        addr = %listener.local_addr()?,
        locations = config.sites.len() * config.lots.len(),
        "listening"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
