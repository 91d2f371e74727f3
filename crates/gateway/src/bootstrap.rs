use std::net::SocketAddr;

use anyhow::Context;
use tracing::info;

use crate::config::ProxyConfig;
use crate::proxy::{build_router, GatewayState};

/// Serve the gateway on an already-configured runtime.
pub async fn serve(config: ProxyConfig) -> anyhow::Result<()> {
    let raw = config.listen_addr();
    let addr: SocketAddr = raw.parse().with_context(|| format!("invalid listen address {raw}"))?;

    info!(
        upstream = %config.upstream_base_url(),
        max_attempts = config.retry.max_attempts,
        retry_delay_ms = config.retry.delay_ms,
        request_timeout_ms = config.timeout.request_timeout_ms,
        "Loaded configuration"
    );
    let state = GatewayState::new(config).context("build item store client")?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("bind {addr}"))?;
    info!(%addr, "starting item gateway");
    axum::serve(listener, build_router(state)).await?;
    Ok(())
}

/// Blocking entry point: builds the Tokio runtime and runs until the server stops or Ctrl+C.
pub fn run(config: ProxyConfig) -> anyhow::Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("build tokio runtime")?;

    runtime.block_on(async move {
        tokio::select! {
            res = serve(config) => res,
            _ = tokio::signal::ctrl_c() => {
                info!("received Ctrl+C, shutting down");
                Ok(())
            }
        }
    })
}
