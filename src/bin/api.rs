//! Todo Tags API server binary.
//!
//! This binary creates the concrete database implementation and passes it
//! to the API server. The API layer remains agnostic of the storage backend.

use std::net::IpAddr;
use std::path::PathBuf;

use clap::Parser;
use miette::Diagnostic;
use thiserror::Error;
use todo_tags::api::{self, ApiError, Config};
use todo_tags::db::{Database, DbError, SqliteDatabase};
use tracing::info;

#[derive(Error, Diagnostic, Debug)]
enum BinaryError {
    #[error("Database error: {0}")]
    #[diagnostic(code(todo_tags::binary::database))]
    Database(#[from] DbError),

    #[error("Failed to create data directory: {0}")]
    #[diagnostic(code(todo_tags::binary::io))]
    Io(#[from] std::io::Error),

    #[error("API server error: {0}")]
    #[diagnostic(code(todo_tags::binary::api))]
    Api(#[from] ApiError),
}

#[derive(Parser)]
#[command(name = "todo-tags-api")]
#[command(author, version, about = "Todo list with tags API server", long_about = None)]
struct Cli {
    /// Host address to bind to (env: TODO_TAGS_HOST, default: 0.0.0.0)
    #[arg(long)]
    host: Option<IpAddr>,

    /// Port to listen on (env: TODO_TAGS_PORT, default: 8080)
    #[arg(short, long)]
    port: Option<u16>,

    /// Database file path (env: TODO_TAGS_DB, default: ./todos.db)
    #[arg(long)]
    db: Option<PathBuf>,
}

impl Cli {
    /// Apply CLI flags on top of env/default configuration.
    fn into_config(self) -> Config {
        let mut config = Config::new();
        if let Some(host) = self.host {
            config = config.with_host(host);
        }
        if let Some(port) = self.port {
            config = config.with_port(port);
        }
        if let Some(db) = self.db {
            config = config.with_db_path(db);
        }
        config
    }
}

#[tokio::main]
async fn main() -> miette::Result<()> {
    api::init_tracing();
    serve(Cli::parse().into_config()).await?;
    Ok(())
}

async fn serve(config: Config) -> Result<(), BinaryError> {
    info!("Opening database at {:?}", config.db_path);

    // Ensure parent directory exists
    if let Some(parent) = config.db_path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }

    let db = SqliteDatabase::open(&config.db_path).await?;

    // Run migrations before starting the server
    db.migrate().await?;
    info!("Database migrations complete");

    api::run(config, db).await?;

    Ok(())
}
