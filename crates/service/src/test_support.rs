#![cfg(test)]
use tokio::sync::OnceCell;
use sea_orm::DatabaseConnection;
use migration::MigratorTrait;
use configs::AppConfig;
use models::db::connect_with_config;

// Ensure migrations run only once across the entire test process
static MIGRATED: OnceCell<()> = OnceCell::const_new();

/// Connection to the configured test database with the schema in place.
pub async fn get_db() -> Result<DatabaseConnection, anyhow::Error> {
    let mut cfg = AppConfig::load_and_validate()?.database;
    cfg.min_connections = cfg.min_connections.min(1);
    cfg.connect_timeout_secs = cfg.connect_timeout_secs.min(5);
    cfg.acquire_timeout_secs = cfg.acquire_timeout_secs.min(10);

    MIGRATED
        .get_or_try_init(|| async {
            let db = connect_with_config(&cfg).await?;
            migration::Migrator::up(&db, None).await?;
            Ok::<(), anyhow::Error>(())
        })
        .await?;

    // Fresh connection for the current test's runtime
    connect_with_config(&cfg).await
}
