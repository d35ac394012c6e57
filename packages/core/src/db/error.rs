//! Database Error Types
//!
//! This module defines error types for database operations, providing
//! clear error handling for connection, initialization, and query failures.

use std::path::PathBuf;
use thiserror::Error;

/// Database operation errors
///
/// Covers all error cases for database connection, initialization,
/// and basic operations. Store-level errors (missing rows, validation)
/// are handled by [`StoreError`].
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to establish database connection
    #[error("Failed to connect to database at {path}: {source}")]
    ConnectionFailed {
        path: PathBuf,
        source: libsql::Error,
    },

    /// Permission denied when accessing database
    #[error("Permission denied for database path: {path}")]
    PermissionDenied { path: PathBuf },

    /// Failed to create parent directory
    #[error("Failed to create parent directory for database: {0}")]
    DirectoryCreationFailed(#[from] std::io::Error),

    /// libsql operation error
    #[error("Database operation failed: {0}")]
    LibsqlError(#[from] libsql::Error),

    /// SQL execution error with context
    #[error("SQL execution failed: {context}")]
    SqlExecutionError { context: String },
}

impl DatabaseError {
    /// Create a connection failed error
    pub fn connection_failed(path: PathBuf, source: libsql::Error) -> Self {
        Self::ConnectionFailed { path, source }
    }

    /// Create a permission denied error
    pub fn permission_denied(path: PathBuf) -> Self {
        Self::PermissionDenied { path }
    }

    /// Create a SQL execution error with context
    pub fn sql_execution(context: impl Into<String>) -> Self {
        Self::SqlExecutionError {
            context: context.into(),
        }
    }
}

/// Store operation errors
///
/// The error surface of the [`crate::db::TreeStore`] trait: every backend
/// maps its failures into these cases so callers never see backend detail.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Backend unreachable or query failed
    #[error("Store unavailable: {0}")]
    Unavailable(#[from] DatabaseError),

    /// Referenced row does not exist
    #[error("Node not found: {id}")]
    NotFound { id: i64 },

    /// Input rejected before reaching the backend
    #[error("Validation failed: {0}")]
    Validation(#[from] crate::models::ValidationError),

    /// Unexpected internal failure (row conversion, corrupt data)
    #[error("Internal store error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl StoreError {
    /// Create a not found error
    pub fn not_found(id: i64) -> Self {
        Self::NotFound { id }
    }
}
