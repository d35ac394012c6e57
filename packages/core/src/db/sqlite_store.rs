//! SQLite Tree Store
//!
//! [`TreeStore`] implementation backed by [`DatabaseService`] (libsql).
//! All SQL for the `tree` table lives here; the service layer only sees
//! the trait.

use crate::db::error::{DatabaseError, StoreError};
use crate::db::tree_store::TreeStore;
use crate::db::DatabaseService;
use crate::models::{NewNode, Node, NodeType};
use anyhow::Context;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

/// libsql-backed tree store.
///
/// Cheap to clone; shares the underlying [`DatabaseService`].
#[derive(Debug, Clone)]
pub struct SqliteStore {
    db: Arc<DatabaseService>,
}

impl SqliteStore {
    pub fn new(db: Arc<DatabaseService>) -> Self {
        Self { db }
    }

    /// Convert a `tree` row to a [`Node`].
    ///
    /// Column order must match the SELECT lists below:
    /// `id, name, type, parentId`.
    fn row_to_node(row: &libsql::Row) -> Result<Node, StoreError> {
        let id: i64 = row.get(0).context("Failed to get id column")?;
        let name: String = row.get(1).context("Failed to get name column")?;
        let type_str: String = row.get(2).context("Failed to get type column")?;
        let parent_id: Option<i64> = row.get(3).context("Failed to get parentId column")?;

        let node_type = NodeType::parse(&type_str)
            .with_context(|| format!("Corrupt type column for row {}", id))?;

        Ok(Node {
            id,
            name,
            node_type,
            parent_id,
        })
    }

    /// Whether a row with `id` exists.
    async fn exists(&self, conn: &libsql::Connection, id: i64) -> Result<bool, StoreError> {
        let mut rows = conn
            .query("SELECT 1 FROM tree WHERE id = ?", [id])
            .await
            .map_err(|e| {
                DatabaseError::sql_execution(format!("Failed to check row existence: {}", e))
            })?;
        let row = rows
            .next()
            .await
            .map_err(|e| DatabaseError::sql_execution(e.to_string()))?;
        Ok(row.is_some())
    }

    /// Ids of `id` and every descendant, walking parent links in memory.
    ///
    /// One full-table scan instead of a recursive query keeps this within
    /// plain SQL; tree sizes here are UI-scale.
    async fn collect_subtree_ids(
        &self,
        conn: &libsql::Connection,
        id: i64,
    ) -> Result<Vec<i64>, StoreError> {
        let mut rows = conn
            .query("SELECT id, parentId FROM tree", ())
            .await
            .map_err(|e| {
                DatabaseError::sql_execution(format!("Failed to scan tree for subtree: {}", e))
            })?;

        let mut children_of: HashMap<i64, Vec<i64>> = HashMap::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| DatabaseError::sql_execution(e.to_string()))?
        {
            let row_id: i64 = row.get(0).context("Failed to get id column")?;
            let parent_id: Option<i64> = row.get(1).context("Failed to get parentId column")?;
            if let Some(parent_id) = parent_id {
                children_of.entry(parent_id).or_default().push(row_id);
            }
        }

        let mut ids = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            ids.push(current);
            if let Some(children) = children_of.get(&current) {
                stack.extend(children);
            }
        }
        Ok(ids)
    }
}

#[async_trait]
impl TreeStore for SqliteStore {
    async fn list_all(&self) -> Result<Vec<Node>, StoreError> {
        let conn = self.db.connect_with_timeout().await?;

        // NULL parentId sorts first, so roots lead the result
        let mut rows = conn
            .query(
                "SELECT id, name, type, parentId FROM tree ORDER BY parentId, id",
                (),
            )
            .await
            .map_err(|e| DatabaseError::sql_execution(format!("Failed to list tree: {}", e)))?;

        let mut nodes = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| DatabaseError::sql_execution(e.to_string()))?
        {
            nodes.push(Self::row_to_node(&row)?);
        }
        Ok(nodes)
    }

    async fn insert(&self, node: &NewNode) -> Result<i64, StoreError> {
        node.validate()?;

        let conn = self.db.connect_with_timeout().await?;

        // A dangling parent would be invisible in every projection
        if let Some(parent_id) = node.parent_id {
            if !self.exists(&conn, parent_id).await? {
                return Err(StoreError::not_found(parent_id));
            }
        }

        conn.execute(
            "INSERT INTO tree (name, type, parentId) VALUES (?, ?, ?)",
            (node.name.as_str(), node.node_type.as_str(), node.parent_id),
        )
        .await
        .map_err(|e| DatabaseError::sql_execution(format!("Failed to insert node: {}", e)))?;

        Ok(conn.last_insert_rowid())
    }

    async fn delete_subtree(&self, id: i64) -> Result<u64, StoreError> {
        let conn = self.db.connect_with_timeout().await?;

        if !self.exists(&conn, id).await? {
            return Err(StoreError::not_found(id));
        }

        let ids = self.collect_subtree_ids(&conn, id).await?;

        // Ids come from the table itself, safe to inline
        let id_list = ids
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        let deleted = conn
            .execute(&format!("DELETE FROM tree WHERE id IN ({})", id_list), ())
            .await
            .map_err(|e| {
                DatabaseError::sql_execution(format!("Failed to delete subtree: {}", e))
            })?;

        Ok(deleted)
    }
}
