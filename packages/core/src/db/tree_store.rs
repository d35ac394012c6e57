//! Tree Store Abstraction
//!
//! This module defines the storage contract the service layer depends on.
//! Backends implement [`TreeStore`]; the rest of the crate only sees the
//! trait, so the persistence engine can be swapped without touching tree
//! or graph logic.

use crate::db::error::StoreError;
use crate::models::{NewNode, Node};
use async_trait::async_trait;

/// Persistence contract for the flat tree rows.
///
/// # Ordering
///
/// `list_all` returns rows sorted by `(parent_id, id)` with roots first
/// (null parent sorts before any value). Every backend must honor this:
/// the nested tree builder and the renderer both rely on it for stable
/// sibling order.
///
/// # Error surface
///
/// All methods map backend failures into [`StoreError`]; callers never see
/// backend-specific error types.
#[async_trait]
pub trait TreeStore: Send + Sync {
    /// Fetch every row, ordered by `(parent_id, id)` with roots first.
    async fn list_all(&self) -> Result<Vec<Node>, StoreError>;

    /// Insert a validated draft and return the assigned id.
    ///
    /// Ids are assigned by the backend and never reused, so a newly
    /// inserted row can never collide with a previously deleted one.
    async fn insert(&self, node: &NewNode) -> Result<i64, StoreError>;

    /// Delete the row `id` and its entire subtree.
    ///
    /// Returns the number of rows removed.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` when `id` does not exist; the store
    /// is left unchanged in that case.
    async fn delete_subtree(&self, id: i64) -> Result<u64, StoreError>;
}
