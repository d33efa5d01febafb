use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use bugbook_core::storage::{InMemoryStorage, SqliteStorage, Storage};
use bugbook_core::DatabaseManager;
use bugbook_web::router::app_router;
use bugbook_web::state::AppState;
use bugbook_web::logging;

#[derive(Parser)]
#[command(name = "bugbook-web")]
#[command(about = "Bug tracker and contact book web server")]
#[command(version = "0.1.0")]
struct Cli {
    /// Port to run the server on
    #[arg(short, long, default_value = "3000")]
    port: u16,

    /// SQLite database file; falls back to BUGBOOK_DB, then to the in-memory store
    #[arg(long)]
    db: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize logging
    logging::init_logging();

    let cli = Cli::parse();

    let db_path = cli
        .db
        .or_else(|| std::env::var("BUGBOOK_DB").ok().map(PathBuf::from));

    let storage: Arc<dyn Storage> = match db_path {
        Some(path) => {
            info!("Using SQLite database at {}", path.display());
            let manager = DatabaseManager::open(&path)?;
            manager.run_migrations()?;
            Arc::new(SqliteStorage::new(Arc::new(manager)))
        }
        None => {
            info!("No database configured, using in-memory storage");
            Arc::new(InMemoryStorage::new())
        }
    };

    let app = app_router(AppState { storage });

    let bind_addr = format!("0.0.0.0:{}", cli.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

    println!(
        "Web server listening on {} (visit http://127.0.0.1:{}/contacts)",
        bind_addr, cli.port
    );
    axum::serve(listener, app).await?;
    Ok(())
}
