//! In-Memory Tree Store
//!
//! [`TreeStore`] implementation over a `BTreeMap`, used by tests and
//! throwaway sessions. Mirrors the SQLite store's behavior exactly:
//! monotonically increasing ids that are never reused, parent existence
//! enforced on insert, and `(parent_id, id)` ordering with roots first.

use crate::db::error::StoreError;
use crate::db::tree_store::TreeStore;
use crate::models::{NewNode, Node};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Debug)]
pub struct MemoryStore {
    rows: Arc<Mutex<BTreeMap<i64, Node>>>,
    next_id: AtomicI64,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            rows: Arc::new(Mutex::new(BTreeMap::new())),
            next_id: AtomicI64::new(1),
        }
    }

    /// Store pre-seeded with the given rows; the id counter continues
    /// after the highest seeded id.
    pub fn with_rows(rows: Vec<Node>) -> Self {
        let max_id = rows.iter().map(|n| n.id).max().unwrap_or(0);
        let map: BTreeMap<i64, Node> = rows.into_iter().map(|n| (n.id, n)).collect();
        Self {
            rows: Arc::new(Mutex::new(map)),
            next_id: AtomicI64::new(max_id + 1),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<i64, Node>> {
        // Mutex poisoning only happens when a test panicked mid-lock
        self.rows.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl TreeStore for MemoryStore {
    async fn list_all(&self) -> Result<Vec<Node>, StoreError> {
        let mut nodes: Vec<Node> = self.lock().values().cloned().collect();
        // Option<i64> orders None first, matching SQL NULL ordering
        nodes.sort_by_key(|n| (n.parent_id, n.id));
        Ok(nodes)
    }

    async fn insert(&self, node: &NewNode) -> Result<i64, StoreError> {
        node.validate()?;

        let mut rows = self.lock();
        if let Some(parent_id) = node.parent_id {
            if !rows.contains_key(&parent_id) {
                return Err(StoreError::not_found(parent_id));
            }
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        rows.insert(
            id,
            Node {
                id,
                name: node.name.clone(),
                node_type: node.node_type,
                parent_id: node.parent_id,
            },
        );
        Ok(id)
    }

    async fn delete_subtree(&self, id: i64) -> Result<u64, StoreError> {
        let mut rows = self.lock();
        if !rows.contains_key(&id) {
            return Err(StoreError::not_found(id));
        }

        let mut doomed = vec![id];
        let mut index = 0;
        while index < doomed.len() {
            let current = doomed[index];
            index += 1;
            doomed.extend(
                rows.values()
                    .filter(|n| n.parent_id == Some(current))
                    .map(|n| n.id),
            );
        }

        for id in &doomed {
            rows.remove(id);
        }
        Ok(doomed.len() as u64)
    }
}
