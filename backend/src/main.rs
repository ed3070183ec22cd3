mod config;
mod db;
mod error;
mod leads;
mod routes;
mod status;
mod store;
mod timestamps;
mod validation;

use std::net::SocketAddr;
use std::sync::Arc;

use config::Config;
use leads::LeadRepository;
use status::StatusCheckRepository;
use store::{DynDocumentStore, PgDocumentStore};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Shared per-request state. Everything inside is cheap to clone; the store
/// handle is created once at startup.
#[derive(Clone)]
pub struct AppState {
    pub store: DynDocumentStore,
    pub leads: LeadRepository,
    pub status_checks: StatusCheckRepository,
    pub config: Config,
}

impl AppState {
    pub fn new(store: DynDocumentStore, config: Config) -> Self {
        Self {
            leads: LeadRepository::new(store.clone()),
            status_checks: StatusCheckRepository::new(store.clone()),
            store,
            config,
        }
    }
}

#[tokio::main]
async fn main() -> config::Result<()> {
    // 1. Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load configuration
    let cfg = config::load()?;
    info!("Starting backend in {:?} mode", cfg.env);

    // 3. Create Postgres connection pool (once for the whole process)
    let pool = db::create_pool(&cfg.database_url, &cfg.db_name).await?;
    db::ensure_collections(&pool).await?;
    info!("Connected to Postgres database '{}'", cfg.db_name);

    // 4. Build application state
    let store: DynDocumentStore = Arc::new(PgDocumentStore::new(pool.clone()));
    let state = AppState::new(store, cfg.clone());

    // 5. Build router
    let app = routes::build_router(state);

    // 6. Start HTTP server
    let addr = SocketAddr::from(([0, 0, 0, 0], cfg.http_port));
    info!("Listening on http://{}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // 7. Release the store connection
    pool.close().await;
    info!("Postgres pool closed, bye");

    Ok(())
}

/// Resolves on Ctrl-C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {:?}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {:?}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
