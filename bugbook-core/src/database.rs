use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::Connection;
use tracing::info;

use crate::common::error::{BugbookError, Result};

/// Owns the SQLite connection and applies schema migrations.
///
/// rusqlite connections are not `Sync`, so the single connection lives behind
/// a mutex and storage methods borrow it for the duration of each query.
pub struct DatabaseManager {
    conn: Mutex<Connection>,
}

impl DatabaseManager {
    /// Open (creating if necessary) a file-backed database.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path.as_ref()).map_err(|e| BugbookError::Database {
            message: format!("Failed to open database: {e}"),
        })?;

        info!("Opened database at {}", path.as_ref().display());
        Self::configure(conn)
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|e| BugbookError::Database {
            message: format!("Failed to open in-memory database: {e}"),
        })?;
        Self::configure(conn)
    }

    fn configure(conn: Connection) -> Result<Self> {
        conn.execute_batch(
            r#"
            PRAGMA journal_mode=WAL;
            PRAGMA foreign_keys=ON;
            "#,
        )
        .map_err(|e| BugbookError::Database {
            message: format!("Failed to configure connection: {e}"),
        })?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Borrow the connection for a query.
    pub fn connection(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap()
    }

    /// Run database migrations.
    pub fn run_migrations(&self) -> Result<()> {
        info!("Running database migrations...");

        let conn = self.connection();

        let migration_sql_001 = include_str!("../migrations/001_create_tables.sql");
        conn.execute_batch(migration_sql_001)
            .map_err(|e| BugbookError::Database {
                message: format!("Failed to run base migration: {e}"),
            })?;

        let migration_sql_002 = include_str!("../migrations/002_indexes.sql");
        conn.execute_batch(migration_sql_002)
            .map_err(|e| BugbookError::Database {
                message: format!("Failed to run index migration: {e}"),
            })?;

        info!("Database migrations completed successfully");
        Ok(())
    }
}
