use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::signal;
use tracing_subscriber::EnvFilter;

use staffing_backend::config::AppConfig;
use staffing_backend::routes;
use staffing_backend::state::AppState;
use staffing_backend::store::{AirtableStore, Base};
use staffing_backend::webhooks::HttpWebhookSender;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env()?;
    tracing::info!(
        component = "server",
        airtable_api_url = %config.airtable_api_url,
        airtable_base_id = %config.airtable_base_id,
        airtable_api_key = %config.redacted_api_key(),
        jobs_table = %config.tables.jobs,
        webhooks_configured = config.webhooks.configured_count(),
        server_host = %config.server_host,
        server_port = config.server_port,
        "loaded backend configuration"
    );

    let store = Arc::new(AirtableStore::from_config(&config)?);
    let base = Base::new(store, config.tables.clone());
    let webhooks = Arc::new(HttpWebhookSender::from_config(&config)?);

    let listen_addr: SocketAddr =
        format!("{}:{}", config.server_host, config.server_port).parse()?;
    let state = AppState::new(config, base, webhooks);
    let router = routes::create_router(state);

    let listener = TcpListener::bind(listen_addr).await?;
    tracing::info!("listening on {}", listen_addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        return;
    }
    tracing::info!("server received shutdown signal");
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
