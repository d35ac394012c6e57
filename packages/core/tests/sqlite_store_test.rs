//! Integration tests for SqliteStore
//!
//! Tests cover:
//! - Schema persistence across reopen
//! - Service pipeline over the real libsql backend
//! - Subtree deletion against stored rows

use anyhow::Result;
use graphdir_core::{
    db::{DatabaseService, SqliteStore, TreeStore},
    graph::GraphProjection,
    models::{NewNode, NodeType},
    services::TreeService,
};
use std::sync::Arc;
use tempfile::TempDir;

/// Test helper: SqliteStore over a fresh on-disk database
async fn create_test_store() -> Result<(SqliteStore, TempDir)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("test.db");
    let db = DatabaseService::new(db_path).await?;
    Ok((SqliteStore::new(Arc::new(db)), temp_dir))
}

#[tokio::test]
async fn test_rows_survive_reopen() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("persist.db");

    {
        let db = DatabaseService::new(db_path.clone()).await?;
        let store = SqliteStore::new(Arc::new(db));
        let root = store
            .insert(&NewNode::new("root", NodeType::Folder, None))
            .await?;
        store
            .insert(&NewNode::new("a.txt", NodeType::File, Some(root)))
            .await?;
    }

    let db = DatabaseService::new(db_path).await?;
    let store = SqliteStore::new(Arc::new(db));
    let rows = store.list_all().await?;
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].name, "root");
    Ok(())
}

#[tokio::test]
async fn test_service_pipeline_over_sqlite() -> Result<()> {
    let (store, _temp_dir) = create_test_store().await?;
    let service = TreeService::new(Arc::new(store), GraphProjection::new(1280.0));

    let root = service
        .add_node(NewNode::new("root", NodeType::Folder, None))
        .await?;
    service
        .add_node(NewNode::new("a.txt", NodeType::File, Some(root)))
        .await?;
    service
        .add_node(NewNode::new("b.txt", NodeType::File, Some(root)))
        .await?;

    let graph = service.graph();
    assert_eq!(graph.nodes.len(), 3);
    assert_eq!(graph.edges.len(), 2);
    assert_eq!(graph.nodes[0].x, 640.0);
    Ok(())
}

#[tokio::test]
async fn test_delete_subtree_counts_rows() -> Result<()> {
    let (store, _temp_dir) = create_test_store().await?;

    let root = store
        .insert(&NewNode::new("root", NodeType::Folder, None))
        .await?;
    let docs = store
        .insert(&NewNode::new("docs", NodeType::Folder, Some(root)))
        .await?;
    store
        .insert(&NewNode::new("deep.txt", NodeType::File, Some(docs)))
        .await?;

    assert_eq!(store.delete_subtree(root).await?, 3);
    assert!(store.list_all().await?.is_empty());
    Ok(())
}
