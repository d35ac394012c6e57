//! Service Error Types
//!
//! Errors surfaced by [`crate::services::TreeService`]. Lower layers keep
//! their own error types ([`StoreError`], [`GraphError`]); this enum is
//! the single surface callers handle.

use crate::db::StoreError;
use crate::graph::GraphError;
use crate::models::ValidationError;
use thiserror::Error;

/// Tree service operation errors
#[derive(Error, Debug)]
pub enum TreeServiceError {
    /// Referenced node does not exist
    #[error("Node not found: {id}")]
    NodeNotFound { id: i64 },

    /// Input rejected before touching the store
    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),

    /// Store operation failed
    #[error("Store error: {0}")]
    Store(StoreError),

    /// Graph or paging operation failed
    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    /// Snapshot file could not be written
    #[error("Snapshot write failed: {0}")]
    SnapshotIo(#[from] std::io::Error),

    /// Snapshot document could not be serialized
    #[error("Snapshot serialization failed: {0}")]
    SnapshotSerialization(#[from] serde_json::Error),
}

impl TreeServiceError {
    /// Create a node not found error
    pub fn node_not_found(id: i64) -> Self {
        Self::NodeNotFound { id }
    }
}

// Surface missing rows as the service's own NotFound so callers match on
// one variant regardless of which layer detected it.
impl From<StoreError> for TreeServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { id } => Self::NodeNotFound { id },
            StoreError::Validation(err) => Self::ValidationFailed(err),
            other => Self::Store(other),
        }
    }
}
