use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::info;
use whenext_core::config::WhenextConfig;
use whenext_core::logging::init_tracing;
use whenext_server::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing("whenext_core=info,whenext_server=info,tower_http=info");

    let config = WhenextConfig::load().context("Failed to load configuration")?;
    let addr = config.bind_address();
    let state = AppState::new(config)?;

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("whenext-server listening on http://{}", addr);

    whenext_server::serve(state, listener).await?;

    Ok(())
}
