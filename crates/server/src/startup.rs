use std::{net::SocketAddr, sync::Arc};

use axum::Router;
use configs::AppConfig;
use migration::MigratorTrait;
use service::{ItemService, SeaOrmItemRepository};
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::errors::StartupError;
use crate::routes::{self, ServerState};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn bind_addr(config: &AppConfig) -> Result<SocketAddr, StartupError> {
    let raw = config.server.bind_addr();
    raw.parse().map_err(|_| StartupError::InvalidAddr(raw))
}

/// Connect to Postgres and make sure the `items` table exists.
async fn bootstrap_store(config: &AppConfig) -> Result<ItemService, StartupError> {
    let db = models::db::connect_with_config(&config.database)
        .await
        .map_err(|e| StartupError::Database(e.to_string()))?;
    migration::Migrator::up(&db, None)
        .await
        .map_err(|e| StartupError::Migration(e.to_string()))?;
    info!("items table ready");
    Ok(ItemService::new(Arc::new(SeaOrmItemRepository::new(db))))
}

/// Router for an already-built item service.
pub fn app(items: ItemService) -> Router {
    routes::build_router(ServerState { items }, build_cors())
}

/// Public entry: build the app and run the HTTP server
pub async fn run(config: AppConfig) -> anyhow::Result<()> {
    let addr = bind_addr(&config)?;
    let items = bootstrap_store(&config).await?;

    info!(%addr, "starting item store");
    let listener = tokio::net::TcpListener::bind(addr).await.map_err(StartupError::from)?;
    axum::serve(listener, app(items)).await?;
    Ok(())
}
