use std::time::Duration;

use configs::DatabaseConfig;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};
use tracing::info;

/// Open a pooled connection using the pool settings from `database.*`.
pub async fn connect_with_config(cfg: &DatabaseConfig) -> anyhow::Result<DatabaseConnection> {
    if is_in_memory(&cfg.url) {
        return open_pool(&in_memory_config(&cfg.url)).await;
    }
    open_pool(cfg).await
}

async fn open_pool(cfg: &DatabaseConfig) -> anyhow::Result<DatabaseConnection> {
    let mut opts = ConnectOptions::new(cfg.url.clone());
    opts.max_connections(cfg.max_connections)
        .min_connections(cfg.min_connections)
        .connect_timeout(Duration::from_secs(cfg.connect_timeout_secs))
        .acquire_timeout(Duration::from_secs(cfg.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(cfg.idle_timeout_secs))
        .max_lifetime(Duration::from_secs(cfg.max_lifetime_secs))
        .sqlx_logging(cfg.sqlx_logging);
    let db = Database::connect(opts).await?;
    info!(backend = ?db.get_database_backend(), max_connections = cfg.max_connections, "database connected");
    Ok(db)
}

/// Single-connection SQLite database living only in memory.
///
/// Every pooled connection to `sqlite::memory:` opens its own database, so the
/// pool is pinned to one connection that is never recycled.
pub async fn connect_in_memory() -> anyhow::Result<DatabaseConnection> {
    open_pool(&in_memory_config("sqlite::memory:")).await
}

fn is_in_memory(url: &str) -> bool {
    url.starts_with("sqlite:") && url.contains(":memory:")
}

fn in_memory_config(url: &str) -> DatabaseConfig {
    DatabaseConfig {
        url: url.to_string(),
        max_connections: 1,
        min_connections: 1,
        idle_timeout_secs: 86_400,
        max_lifetime_secs: 86_400,
        ..DatabaseConfig::default()
    }
}
