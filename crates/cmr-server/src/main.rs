mod config;
mod routes;

use cmr_render::RenderEngine;
use config::ServerConfig;
use routes::AppState;
use std::{net::SocketAddr, sync::Arc};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = ServerConfig::from_env();
    info!(?config, "loaded configuration");

    let state = AppState {
        engine: Arc::new(RenderEngine::new(config.render.clone())),
    };

    let app = routes::app(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("CMR service listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
