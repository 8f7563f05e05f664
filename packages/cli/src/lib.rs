// ABOUTME: Server bootstrap for the pagewise binary
// ABOUTME: Opens the database, builds the router and serves it until shutdown

use pagewise_api::{create_app, AppState, ErrorDetail};
use pagewise_storage::DbState;
use tracing::info;

pub mod config;


pub use config::{Config, ConfigError};

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise `default_filter` applies.
pub fn init_tracing(default_filter: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_env(pagewise_config::constants::RUST_LOG)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

/// Open the database described by `config`, or a private in-memory one
pub async fn open_database(config: &Config, in_memory: bool) -> anyhow::Result<DbState> {
    let db = if in_memory {
        info!("Using in-memory database");
        DbState::in_memory().await?
    } else {
        DbState::init_with_path(config.database_path.clone(), config.max_connections).await?
    };
    Ok(db)
}

pub async fn run_server(config: Config, db: DbState) -> anyhow::Result<()> {
    let state = AppState::new(db, ErrorDetail::from_expose_flag(config.expose_error_detail));
    let app = create_app(state, config.request_timeout);

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!(
        "Server listening on http://{} (request timeout {:?})",
        addr, config.request_timeout
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received, draining connections");
}
