//! Database Connection Management
//!
//! This module provides the core database connection and initialization
//! functionality using libsql/Turso for the GraphDirectory tree store.
//!
//! # Architecture
//!
//! - **Path-agnostic**: Accepts any valid PathBuf
//! - **Fixed schema**: One `tree` table, created idempotently on open
//! - **WAL mode**: Write-Ahead Logging for better concurrency
//! - **Foreign keys**: Enabled so `parentId` always references a real row
//!
//! # Database Connection Patterns
//!
//! Use `connect_with_timeout()` in async functions: the 5-second busy
//! timeout lets concurrent operations wait and retry instead of failing
//! immediately with `SQLITE_BUSY`, and avoids SQLite thread-safety
//! violations when the Tokio runtime moves futures between threads.
//! `connect()` is for synchronous, single-threaded contexts only.

use crate::db::error::DatabaseError;
use libsql::{Builder, Database};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Counter for unique shared-cache in-memory database names, so each
/// `new_in_memory()` call gets an isolated database.
static IN_MEMORY_DB_ID: AtomicU64 = AtomicU64::new(0);

/// Keepalive connection for in-memory databases.
///
/// A shared-cache in-memory SQLite database is destroyed when its last
/// connection closes, so the service holds one open for its lifetime.
/// (`libsql::Connection` does not implement `Debug`, hence the wrapper.)
#[derive(Clone)]
struct MemoryKeepalive(#[allow(dead_code)] libsql::Connection);

impl std::fmt::Debug for MemoryKeepalive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("MemoryKeepalive")
    }
}

/// Database service for managing the libsql connection and schema
///
/// # Examples
///
/// ```no_run
/// use graphdir_core::db::DatabaseService;
/// use std::path::PathBuf;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let db_path = PathBuf::from("/path/to/graphdir.db");
///     let db_service = DatabaseService::new(db_path).await?;
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct DatabaseService {
    /// libsql database connection (wrapped in Arc for sharing)
    pub db: Arc<Database>,

    /// Path to the database file
    pub db_path: PathBuf,

    /// Held open for in-memory databases so they outlive per-operation
    /// connections; `None` for file-backed databases.
    _memory_keepalive: Option<MemoryKeepalive>,
}

impl DatabaseService {
    /// Create a new DatabaseService with the specified database path
    ///
    /// This will:
    /// 1. Ensure the parent directory exists (create if needed)
    /// 2. Open/create the database file
    /// 3. Initialize the schema (CREATE TABLE IF NOT EXISTS)
    /// 4. Enable SQLite features (WAL mode, foreign keys)
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if:
    /// - Parent directory cannot be created
    /// - Database connection fails
    /// - Schema initialization fails
    pub async fn new(db_path: PathBuf) -> Result<Self, DatabaseError> {
        // Ensure parent directory exists
        if let Some(parent) = db_path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    if e.kind() == std::io::ErrorKind::PermissionDenied {
                        DatabaseError::permission_denied(db_path.clone())
                    } else {
                        DatabaseError::DirectoryCreationFailed(e)
                    }
                })?;
            }
        }

        // Open database connection using Builder pattern
        let db = Builder::new_local(&db_path)
            .build()
            .await
            .map_err(|e| DatabaseError::connection_failed(db_path.clone(), e))?;

        let service = Self {
            db: Arc::new(db),
            db_path,
            _memory_keepalive: None,
        };

        service.initialize_schema().await?;

        Ok(service)
    }

    /// Create an in-memory DatabaseService (tests, throwaway sessions)
    ///
    /// Uses a uniquely named shared-cache in-memory database: plain
    /// `:memory:` gives every `connect()` its own private database, so the
    /// schema created on open would be invisible to later connections. A
    /// keepalive connection is held because the database is destroyed when
    /// its last connection closes.
    pub async fn new_in_memory() -> Result<Self, DatabaseError> {
        let db_path = PathBuf::from(format!(
            "file:graphdir_mem_{}?mode=memory&cache=shared",
            IN_MEMORY_DB_ID.fetch_add(1, Ordering::Relaxed)
        ));
        let db = Builder::new_local(&db_path)
            .build()
            .await
            .map_err(|e| DatabaseError::connection_failed(db_path.clone(), e))?;

        let keepalive = db
            .connect()
            .map_err(DatabaseError::LibsqlError)?;

        let service = Self {
            db: Arc::new(db),
            db_path,
            _memory_keepalive: Some(MemoryKeepalive(keepalive)),
        };

        service.initialize_schema().await?;

        Ok(service)
    }

    /// Execute a PRAGMA statement
    ///
    /// PRAGMA statements return rows, so we must use query() instead of
    /// execute(). This helper encapsulates that pattern.
    async fn execute_pragma(
        &self,
        conn: &libsql::Connection,
        pragma: &str,
    ) -> Result<(), DatabaseError> {
        let mut stmt = conn.prepare(pragma).await.map_err(|e| {
            DatabaseError::sql_execution(format!("Failed to execute '{}': {}", pragma, e))
        })?;
        let _ = stmt.query(()).await.map_err(|e| {
            DatabaseError::sql_execution(format!("Failed to execute '{}': {}", pragma, e))
        })?;
        Ok(())
    }

    /// Initialize database schema and configuration
    ///
    /// Creates the `tree` table and its parent index using CREATE TABLE IF
    /// NOT EXISTS, so initialization is idempotent (safe to call on every
    /// open).
    ///
    /// # Schema
    ///
    /// - `id`: AUTOINCREMENT primary key (storage identity, never reused)
    /// - `name`: display name, NOT NULL
    /// - `type`: `"file"` or `"folder"`, NOT NULL
    /// - `parentId`: parent row id, NULL for roots, references tree(id)
    async fn initialize_schema(&self) -> Result<(), DatabaseError> {
        let conn = self.connect_with_timeout().await?;

        // Enable WAL mode for better concurrency
        self.execute_pragma(&conn, "PRAGMA journal_mode = WAL")
            .await?;

        // Set busy timeout to 5 seconds (5000ms)
        self.execute_pragma(&conn, "PRAGMA busy_timeout = 5000")
            .await?;

        // Enable foreign key constraints
        self.execute_pragma(&conn, "PRAGMA foreign_keys = ON")
            .await?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS tree (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                type TEXT NOT NULL,
                parentId INTEGER,
                FOREIGN KEY (parentId) REFERENCES tree(id)
            )",
            (),
        )
        .await
        .map_err(|e| DatabaseError::sql_execution(format!("Failed to create tree table: {}", e)))?;

        // Index on parentId (hierarchy queries)
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_tree_parent ON tree(parentId)",
            (),
        )
        .await
        .map_err(|e| {
            DatabaseError::sql_execution(format!("Failed to create index 'idx_tree_parent': {}", e))
        })?;

        Ok(())
    }

    /// Get a synchronous connection to the database
    ///
    /// Only use this in synchronous, single-threaded contexts. In async
    /// functions use `connect_with_timeout()` instead to avoid SQLite
    /// thread-safety violations.
    pub fn connect(&self) -> Result<libsql::Connection, DatabaseError> {
        self.db.connect().map_err(DatabaseError::LibsqlError)
    }

    /// Get an async connection with busy timeout configured
    ///
    /// The safe default for async code: sets a 5-second busy timeout so
    /// concurrent operations wait and retry instead of failing immediately
    /// when the database is locked.
    pub async fn connect_with_timeout(&self) -> Result<libsql::Connection, DatabaseError> {
        let conn = self.connect()?;

        // Set busy timeout on this connection
        self.execute_pragma(&conn, "PRAGMA busy_timeout = 5000")
            .await?;

        Ok(conn)
    }
}
