//! HTTP API: configuration, router, handlers and server loop.

mod extract;
mod handlers;
pub mod links;
pub mod routes;
mod state;


use std::env;
use std::net::IpAddr;
use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use handlers::ErrorResponse;
pub use state::AppState;

use crate::db::Database;

/// Environment variable overriding the bind address.
pub const HOST_ENV: &str = "TODO_TAGS_HOST";
/// Environment variable overriding the port.
pub const PORT_ENV: &str = "TODO_TAGS_PORT";
/// Environment variable overriding the database file path.
pub const DB_ENV: &str = "TODO_TAGS_DB";

/// API server errors
#[derive(Error, Diagnostic, Debug)]
pub enum ApiError {
    #[error("Failed to bind {addr}: {source}")]
    #[diagnostic(
        code(todo_tags::api::bind),
        help("Is another process already listening on this port? Try --port.")
    )]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    #[diagnostic(code(todo_tags::api::server))]
    Server(#[from] std::io::Error),
}

/// API server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Host address to bind to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// SQLite database file
    pub db_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: IpAddr::from([0, 0, 0, 0]),
            port: 8080,
            db_path: PathBuf::from("todos.db"),
        }
    }
}

impl Config {
    /// Defaults overridden by `TODO_TAGS_HOST`, `TODO_TAGS_PORT` and `TODO_TAGS_DB`.
    ///
    /// Unparseable values are ignored with a warning.
    pub fn new() -> Self {
        let mut config = Self::default();

        if let Ok(host) = env::var(HOST_ENV) {
            match host.parse() {
                Ok(host) => config.host = host,
                Err(_) => warn!("Ignoring invalid {}: {}", HOST_ENV, host),
            }
        }
        if let Ok(port) = env::var(PORT_ENV) {
            match port.parse() {
                Ok(port) => config.port = port,
                Err(_) => warn!("Ignoring invalid {}: {}", PORT_ENV, port),
            }
        }
        if let Ok(db_path) = env::var(DB_ENV)
            && !db_path.is_empty()
        {
            config.db_path = PathBuf::from(db_path);
        }

        config
    }

    pub fn with_host(mut self, host: IpAddr) -> Self {
        self.host = host;
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_db_path(mut self, db_path: PathBuf) -> Self {
        self.db_path = db_path;
        self
    }
}

/// Initialize tracing subscriber with env filter
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "todo_tags=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Run the API server with the given configuration and database.
///
/// Serves until Ctrl-C is received.
pub async fn run<D: Database + 'static>(config: Config, db: D) -> Result<(), ApiError> {
    let app = routes::create_router(AppState::new(db)).layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|source| ApiError::Bind {
            addr: addr.clone(),
            source,
        })?;
    info!("API server listening on http://{}", addr);
    info!("API docs available at http://{}/docs", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("API server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
