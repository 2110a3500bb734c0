use std::{future::Future, net::SocketAddr, sync::Arc};

use axum::Router;
use configs::{AppConfig, StorageBackend};
use migration::MigratorTrait;
use service::marker::{
    repo::{JsonFileMarkerRepository, SeaOrmMarkerRepository},
    MarkerRepository, MarkerService,
};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::{routes, state::AppState};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn bind_addr(cfg: &AppConfig) -> anyhow::Result<SocketAddr> {
    Ok(format!("{}:{}", cfg.server.host, cfg.server.port).parse()?)
}

/// Open the configured storage backend and wrap it in a `MarkerService`.
pub async fn build_marker_service(cfg: &AppConfig) -> anyhow::Result<MarkerService> {
    let repo: Arc<dyn MarkerRepository> = match cfg.storage.backend {
        StorageBackend::Database => {
            let db = models::db::connect_with_config(&cfg.database).await?;
            if cfg.database.run_migrations {
                migration::Migrator::up(&db, None).await?;
                info!(event = "migrations_applied", "database schema up to date");
            }
            Arc::new(SeaOrmMarkerRepository::new(db))
        }
        StorageBackend::File => match cfg.storage.file_path.as_deref() {
            Some(path) => {
                common::env::ensure_parent_dir(path).await?;
                info!(%path, "using json file marker storage");
                Arc::new(JsonFileMarkerRepository::open(path).await?)
            }
            None => {
                warn!("storage.file_path not set; markers are kept in memory only");
                Arc::new(JsonFileMarkerRepository::in_memory().await)
            }
        },
    };
    Ok(MarkerService::new(repo))
}

/// Build the application router from config, connecting storage on the way.
pub async fn build_app(cfg: &AppConfig) -> anyhow::Result<Router> {
    let markers = build_marker_service(cfg).await?;
    let state = AppState::new(markers);
    Ok(routes::build_router(state, build_cors(), &cfg.server.api_prefix))
}

/// Serve `app` on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, app: Router, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app).with_graceful_shutdown(shutdown).await?;
    Ok(())
}

/// Public entry: build the app and run the HTTP server until Ctrl+C.
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let app = build_app(&cfg).await?;

    let addr = bind_addr(&cfg)?;
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, api_prefix = %cfg.server.api_prefix, backend = ?cfg.storage.backend, "marker server listening");
    serve(listener, app, shutdown_signal()).await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    info!(event = "shutdown_signal", "received Ctrl+C, shutting down");
}
