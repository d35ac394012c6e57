//! Tree Service - Orchestration over Store, Tree, and Graph
//!
//! [`TreeService`] owns the published tree/graph state and keeps it
//! consistent with the store:
//!
//! 1. Mutations (insert, delete) go to the store first
//! 2. A rebuild fetches all rows, rebuilds the nested tree, reprojects
//!    the graph, and publishes both by atomic `Arc` swap
//! 3. Readers clone the current `Arc`s and are never blocked by, or
//!    exposed to, a rebuild in progress
//!
//! Rebuild requests coalesce: while one rebuild runs, any number of
//! further requests collapse into a single trailing rebuild, so a burst
//! of mutations costs two rebuilds at most.

use crate::db::TreeStore;
use crate::graph::{GraphData, GraphProjection, VisibilityWindow};
use crate::models::{NewNode, TreeModel};
use crate::services::error::TreeServiceError;
use serde_json::json;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use tokio::sync::Mutex;

/// Orchestrates the store, the nested tree, and the graph projection.
pub struct TreeService {
    store: Arc<dyn TreeStore>,
    projection: GraphProjection,

    /// Published state, replaced wholesale by `rebuild`
    model: RwLock<Arc<TreeModel>>,
    graph: RwLock<Arc<GraphData>>,

    /// Trailing-edge coalescing for rebuild requests
    rebuild_pending: AtomicBool,
    rebuild_gate: Mutex<()>,
}

impl TreeService {
    /// Create a service over `store`; published state starts empty until
    /// the first [`rebuild`](Self::rebuild).
    pub fn new(store: Arc<dyn TreeStore>, projection: GraphProjection) -> Self {
        Self {
            store,
            projection,
            model: RwLock::new(Arc::new(TreeModel::new())),
            graph: RwLock::new(Arc::new(GraphData::default())),
            rebuild_pending: AtomicBool::new(false),
            rebuild_gate: Mutex::new(()),
        }
    }

    /// Currently published tree.
    pub fn model(&self) -> Arc<TreeModel> {
        self.model.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Currently published graph.
    pub fn graph(&self) -> Arc<GraphData> {
        self.graph.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Fetch all rows, rebuild tree and graph, publish atomically.
    ///
    /// On failure the previously published state is left untouched, so
    /// readers keep a consistent (if stale) view.
    pub async fn rebuild(&self) -> Result<(), TreeServiceError> {
        let rows = self.store.list_all().await?;

        let model = Arc::new(TreeModel::build(&rows));
        let graph = Arc::new(self.projection.project(&model));

        tracing::debug!(
            rows = rows.len(),
            nodes = graph.nodes.len(),
            edges = graph.edges.len(),
            "tree and graph republished"
        );

        *self.model.write().unwrap_or_else(|e| e.into_inner()) = model;
        *self.graph.write().unwrap_or_else(|e| e.into_inner()) = graph;
        Ok(())
    }

    /// Request a rebuild, coalescing with any rebuild already running.
    ///
    /// The caller holding the gate drains the pending flag in a loop, so
    /// requests arriving mid-rebuild are served by one trailing rebuild
    /// instead of queueing.
    pub async fn request_rebuild(&self) -> Result<(), TreeServiceError> {
        self.rebuild_pending.store(true, Ordering::SeqCst);

        let Ok(_guard) = self.rebuild_gate.try_lock() else {
            // Another caller holds the gate and will see the flag
            return Ok(());
        };

        while self.rebuild_pending.swap(false, Ordering::SeqCst) {
            self.rebuild().await?;
        }
        Ok(())
    }

    /// Validate and insert a node, then republish. Returns the assigned id.
    pub async fn add_node(&self, draft: NewNode) -> Result<i64, TreeServiceError> {
        draft.validate()?;
        let id = self.store.insert(&draft).await?;
        tracing::info!(id, name = %draft.name, "node inserted");
        self.request_rebuild().await?;
        Ok(id)
    }

    /// Delete a node and its subtree, then republish. Returns the number
    /// of rows removed.
    pub async fn delete_subtree(&self, id: i64) -> Result<u64, TreeServiceError> {
        let deleted = self.store.delete_subtree(id).await?;
        tracing::info!(id, deleted, "subtree deleted");
        self.request_rebuild().await?;
        Ok(deleted)
    }

    /// Snapshot document of the published tree: the nested roots under a
    /// `tree` key. A pure function of current state, so writing the same
    /// state twice produces identical bytes.
    pub fn snapshot(&self) -> Result<serde_json::Value, TreeServiceError> {
        let model = self.model();
        Ok(json!({ "tree": model.roots() }))
    }

    /// Write the snapshot document to `path` as pretty-printed JSON.
    pub async fn write_snapshot(&self, path: &Path) -> Result<(), TreeServiceError> {
        let document = self.snapshot()?;
        let bytes = serde_json::to_vec_pretty(&document)?;
        tokio::fs::write(path, bytes).await?;
        tracing::debug!(path = %path.display(), "snapshot written");
        Ok(())
    }

    /// Recompute X coordinates for the page `window` shows and publish
    /// the updated graph.
    ///
    /// The published graph is cloned, repositioned, and swapped back in;
    /// readers never observe a half-updated layout.
    pub async fn refresh_page_layout(
        &self,
        window: &VisibilityWindow,
    ) -> Result<Arc<GraphData>, TreeServiceError> {
        let current = self.graph();
        let visible = window.visible_ids(&current)?;

        let mut updated = (*current).clone();
        self.projection.recalculate_positions(&mut updated, &visible);
        let updated = Arc::new(updated);

        *self.graph.write().unwrap_or_else(|e| e.into_inner()) = updated.clone();
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use crate::models::{Node, NodeType};

    fn seeded_service() -> TreeService {
        let store = MemoryStore::with_rows(vec![
            Node { id: 1, name: "root".into(), node_type: NodeType::Folder, parent_id: None },
            Node { id: 2, name: "a.txt".into(), node_type: NodeType::File, parent_id: Some(1) },
            Node { id: 3, name: "b.txt".into(), node_type: NodeType::File, parent_id: Some(1) },
        ]);
        TreeService::new(Arc::new(store), GraphProjection::new(1000.0))
    }

    #[tokio::test]
    async fn test_rebuild_publishes_tree_and_graph() {
        let service = seeded_service();
        assert!(service.model().is_empty());

        service.rebuild().await.unwrap();

        let model = service.model();
        assert_eq!(model.len(), 3);
        let graph = service.graph();
        assert_eq!(graph.nodes.len(), 3);
        assert_eq!(graph.edges.len(), 2);
    }

    #[tokio::test]
    async fn test_add_node_republishes() {
        let service = seeded_service();
        service.rebuild().await.unwrap();

        let id = service
            .add_node(NewNode::new("c.txt", NodeType::File, Some(1)))
            .await
            .unwrap();
        assert_eq!(id, 4);

        let model = service.model();
        assert_eq!(model.find_by_id(1).unwrap().children.len(), 3);
    }

    #[tokio::test]
    async fn test_add_node_with_missing_parent_fails() {
        let service = seeded_service();
        service.rebuild().await.unwrap();

        let result = service
            .add_node(NewNode::new("x", NodeType::File, Some(99)))
            .await;
        assert!(matches!(
            result,
            Err(TreeServiceError::NodeNotFound { id: 99 })
        ));
        // Published state unchanged after the failed mutation
        assert_eq!(service.model().len(), 3);
    }

    #[tokio::test]
    async fn test_delete_subtree_removes_edges() {
        let service = seeded_service();
        service.rebuild().await.unwrap();

        let deleted = service.delete_subtree(1).await.unwrap();
        assert_eq!(deleted, 3);

        let graph = service.graph();
        assert!(graph.nodes.is_empty());
        assert!(graph.edges.is_empty());
    }

    #[tokio::test]
    async fn test_snapshot_is_deterministic() {
        let service = seeded_service();
        service.rebuild().await.unwrap();

        let first = service.snapshot().unwrap();
        let second = service.snapshot().unwrap();
        assert_eq!(first, second);

        assert_eq!(first["tree"][0]["name"], "root");
        assert_eq!(first["tree"][0]["children"][0]["type"], "file");
    }

    #[tokio::test]
    async fn test_write_snapshot_roundtrip() {
        let service = seeded_service();
        service.rebuild().await.unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("treeData.json");
        service.write_snapshot(&path).await.unwrap();

        let bytes = tokio::fs::read(&path).await.unwrap();
        let document: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(document, service.snapshot().unwrap());
    }

    #[tokio::test]
    async fn test_refresh_page_layout_publishes_new_graph() {
        let service = seeded_service();
        service.rebuild().await.unwrap();

        let window = VisibilityWindow::new();
        let updated = service.refresh_page_layout(&window).await.unwrap();

        // Fully visible page: positions unchanged, but republished
        assert_eq!(updated.nodes.len(), 3);
        assert_eq!(*service.graph(), *updated);
    }

    #[tokio::test]
    async fn test_request_rebuild_coalesces() {
        let service = Arc::new(seeded_service());

        // Burst of requests; state must end up consistent
        let mut handles = Vec::new();
        for _ in 0..8 {
            let service = service.clone();
            handles.push(tokio::spawn(async move {
                service.request_rebuild().await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
        // A trailing request with the gate free always rebuilds
        service.request_rebuild().await.unwrap();
        assert_eq!(service.model().len(), 3);
    }
}
