//! Nested Tree Model
//!
//! This module builds the in-memory hierarchical view from flat `tree` rows
//! and provides the structural query/mutation primitives used by the graph
//! projection and the orchestration service.
//!
//! # Architecture
//!
//! - **Fetch-replace**: the model is rebuilt wholesale from the store on
//!   every data change, never patched incrementally
//! - **Exclusive ownership**: nested `TreeNode`s are owned by `TreeModel`;
//!   the graph projection reads them and produces an independent structure
//! - **Graceful degradation**: rows with a missing parent, rows beyond the
//!   depth bound, and cycle participants are skipped with a warning instead
//!   of failing the whole build
//!
//! # Examples
//!
//! ```rust
//! use graphdir_core::models::{Node, NodeType, TreeModel};
//!
//! let rows = vec![
//!     Node { id: 1, name: "root".into(), node_type: NodeType::Folder, parent_id: None },
//!     Node { id: 2, name: "a.txt".into(), node_type: NodeType::File, parent_id: Some(1) },
//! ];
//! let model = TreeModel::build(&rows);
//! assert_eq!(model.roots().len(), 1);
//! assert_eq!(model.find_by_id(2).unwrap().name, "a.txt");
//! ```

use crate::models::node::{Node, NodeType};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Maximum nesting depth accepted when building the nested tree.
///
/// Rows deeper than this are skipped as structurally inconsistent. The bound
/// also caps recursion so a malformed (near-cyclic) parent chain cannot
/// overflow the stack.
pub const MAX_TREE_DEPTH: usize = 1000;

/// Nested form of a tree entry: a [`Node`] plus its ordered children.
///
/// Serializes to the snapshot document shape
/// `{id, name, type, children: [...]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeNode {
    pub id: i64,

    pub name: String,

    #[serde(rename = "type")]
    pub node_type: NodeType,

    /// Ordered children (retrieval order: parent, then id)
    #[serde(default)]
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    /// Create a leaf node with no children.
    pub fn leaf(id: i64, name: impl Into<String>, node_type: NodeType) -> Self {
        Self {
            id,
            name: name.into(),
            node_type,
            children: Vec::new(),
        }
    }

    /// Number of nodes in this subtree, including the node itself.
    pub fn subtree_len(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children.iter());
        }
        count
    }
}

/// In-memory hierarchical view over the flat `tree` rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeModel {
    roots: Vec<TreeNode>,
}

impl TreeModel {
    /// Create an empty model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the nested tree from flat rows.
    ///
    /// Rows are grouped by `parent_id` (pre-indexed, so the build is linear
    /// in the row count) and attached recursively starting from the roots
    /// (`parent_id == None`). Sibling order follows the order of `flat`,
    /// which the store delivers as `ORDER BY parentId, id`.
    ///
    /// # Structural inconsistency
    ///
    /// - A row whose `parent_id` references no row in `flat` is skipped.
    /// - Rows nested beyond [`MAX_TREE_DEPTH`] are skipped.
    /// - Cycle participants never reach a root and are therefore never
    ///   attached; they are reported as unreachable.
    ///
    /// All three cases log a warning and the rest of the tree still builds.
    pub fn build(flat: &[Node]) -> Self {
        let known_ids: std::collections::HashSet<i64> = flat.iter().map(|n| n.id).collect();

        let mut children_of: HashMap<Option<i64>, Vec<&Node>> = HashMap::new();
        let mut skipped_orphans = 0usize;
        for row in flat {
            if let Some(parent_id) = row.parent_id {
                if !known_ids.contains(&parent_id) {
                    tracing::warn!(
                        id = row.id,
                        parent_id,
                        "skipping row with missing parent"
                    );
                    skipped_orphans += 1;
                    continue;
                }
            }
            children_of.entry(row.parent_id).or_default().push(row);
        }

        let mut attached = 0usize;
        let roots = children_of
            .get(&None)
            .map(|rows| {
                rows.iter()
                    .map(|row| Self::attach(row, &children_of, 0, &mut attached))
                    .collect()
            })
            .unwrap_or_default();

        let unreachable = flat.len() - skipped_orphans - attached;
        if unreachable > 0 {
            tracing::warn!(
                unreachable,
                total = flat.len(),
                "rows unreachable from any root (parent cycle suspected)"
            );
        }

        Self { roots }
    }

    fn attach(
        row: &Node,
        children_of: &HashMap<Option<i64>, Vec<&Node>>,
        depth: usize,
        attached: &mut usize,
    ) -> TreeNode {
        *attached += 1;
        let mut node = TreeNode::leaf(row.id, row.name.clone(), row.node_type);

        if depth + 1 > MAX_TREE_DEPTH {
            if children_of.contains_key(&Some(row.id)) {
                tracing::warn!(id = row.id, depth, "children beyond depth bound skipped");
            }
            return node;
        }

        if let Some(child_rows) = children_of.get(&Some(row.id)) {
            node.children = child_rows
                .iter()
                .map(|child| Self::attach(child, children_of, depth + 1, attached))
                .collect();
        }
        node
    }

    /// Root nodes, in retrieval order.
    pub fn roots(&self) -> &[TreeNode] {
        &self.roots
    }

    /// Total number of nodes in the model.
    pub fn len(&self) -> usize {
        self.roots.iter().map(TreeNode::subtree_len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Find the first node with the given persisted id.
    ///
    /// Traversal is depth-first: root list order, then per-node children in
    /// stored order.
    pub fn find_by_id(&self, id: i64) -> Option<&TreeNode> {
        self.find(|node| node.id == id)
    }

    /// Find the first node with the given name (exact, case-sensitive).
    ///
    /// Names need not be unique; the first match in traversal order wins.
    pub fn find_by_name(&self, name: &str) -> Option<&TreeNode> {
        self.find(|node| node.name == name)
    }

    fn find(&self, predicate: impl Fn(&TreeNode) -> bool) -> Option<&TreeNode> {
        // Explicit stack keeps the lookup safe on deep trees; children are
        // pushed in reverse so pop order matches stored sibling order.
        let mut stack: Vec<&TreeNode> = self.roots.iter().rev().collect();
        while let Some(node) = stack.pop() {
            if predicate(node) {
                return Some(node);
            }
            stack.extend(node.children.iter().rev());
        }
        None
    }

    /// Collect every node of the given type, in traversal order.
    pub fn find_nodes_by_type(&self, node_type: NodeType) -> Vec<&TreeNode> {
        let mut found = Vec::new();
        let mut stack: Vec<&TreeNode> = self.roots.iter().rev().collect();
        while let Some(node) = stack.pop() {
            if node.node_type == node_type {
                found.push(node);
            }
            stack.extend(node.children.iter().rev());
        }
        found
    }

    /// Attach `node` under `parent_id`, or to the root list when `None`.
    ///
    /// A non-null `parent_id` that matches no node is a silent no-op (only
    /// logged): the caller is expected to treat the miss as a signal to
    /// re-sync from the repository.
    pub fn add_node(&mut self, node: TreeNode, parent_id: Option<i64>) {
        match parent_id {
            None => self.roots.push(node),
            Some(id) => match Self::find_mut(&mut self.roots, id) {
                Some(parent) => parent.children.push(node),
                None => {
                    tracing::warn!(parent_id = id, "add_node: parent not found, ignoring");
                }
            },
        }
    }

    fn find_mut(nodes: &mut [TreeNode], id: i64) -> Option<&mut TreeNode> {
        for node in nodes.iter_mut() {
            if node.id == id {
                return Some(node);
            }
            if let Some(found) = Self::find_mut(&mut node.children, id) {
                return Some(found);
            }
        }
        None
    }

    /// Remove the node with `id` and, structurally, its entire subtree.
    ///
    /// Returns `true` when a node was removed.
    pub fn remove_subtree(&mut self, id: i64) -> bool {
        Self::remove_from(&mut self.roots, id)
    }

    fn remove_from(nodes: &mut Vec<TreeNode>, id: i64) -> bool {
        let before = nodes.len();
        nodes.retain(|node| node.id != id);
        let mut removed = nodes.len() != before;
        for node in nodes.iter_mut() {
            removed |= Self::remove_from(&mut node.children, id);
        }
        removed
    }

    /// Depth-first re-flattening back to the persisted row form.
    ///
    /// `parent_id` links are reassigned from the nested structure, so
    /// `TreeModel::build(&model.flatten())` reproduces an equivalent model.
    pub fn flatten(&self) -> Vec<Node> {
        let mut rows = Vec::with_capacity(self.len());
        // (node, structural parent id)
        let mut stack: Vec<(&TreeNode, Option<i64>)> =
            self.roots.iter().rev().map(|root| (root, None)).collect();
        while let Some((node, parent_id)) = stack.pop() {
            rows.push(Node {
                id: node.id,
                name: node.name.clone(),
                node_type: node.node_type,
                parent_id,
            });
            for child in node.children.iter().rev() {
                stack.push((child, Some(node.id)));
            }
        }
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture_rows() -> Vec<Node> {
        vec![
            Node { id: 1, name: "root".into(), node_type: NodeType::Folder, parent_id: None },
            Node { id: 2, name: "a.txt".into(), node_type: NodeType::File, parent_id: Some(1) },
            Node { id: 3, name: "b.txt".into(), node_type: NodeType::File, parent_id: Some(1) },
            Node { id: 4, name: "sub".into(), node_type: NodeType::Folder, parent_id: Some(1) },
            Node { id: 5, name: "c.txt".into(), node_type: NodeType::File, parent_id: Some(4) },
            Node { id: 6, name: "other".into(), node_type: NodeType::Folder, parent_id: None },
        ]
    }

    #[test]
    fn test_build_groups_children_in_id_order() {
        let model = TreeModel::build(&fixture_rows());

        assert_eq!(model.roots().len(), 2);
        let root = &model.roots()[0];
        assert_eq!(root.name, "root");
        let child_ids: Vec<i64> = root.children.iter().map(|c| c.id).collect();
        assert_eq!(child_ids, vec![2, 3, 4]);
        assert_eq!(root.children[2].children[0].name, "c.txt");
    }

    #[test]
    fn test_build_skips_row_with_missing_parent() {
        let mut rows = fixture_rows();
        rows.push(Node {
            id: 99,
            name: "stray".into(),
            node_type: NodeType::File,
            parent_id: Some(1234),
        });

        let model = TreeModel::build(&rows);
        assert_eq!(model.len(), 6);
        assert!(model.find_by_id(99).is_none());
    }

    #[test]
    fn test_build_skips_cycle_participants() {
        let mut rows = fixture_rows();
        // 10 -> 11 -> 10: unreachable from any root
        rows.push(Node { id: 10, name: "x".into(), node_type: NodeType::Folder, parent_id: Some(11) });
        rows.push(Node { id: 11, name: "y".into(), node_type: NodeType::Folder, parent_id: Some(10) });

        let model = TreeModel::build(&rows);
        assert_eq!(model.len(), 6);
        assert!(model.find_by_id(10).is_none());
        assert!(model.find_by_id(11).is_none());
    }

    #[test]
    fn test_find_by_id_depth_first() {
        let model = TreeModel::build(&fixture_rows());
        assert_eq!(model.find_by_id(5).unwrap().name, "c.txt");
        assert!(model.find_by_id(42).is_none());
    }

    #[test]
    fn test_find_by_name_first_match_wins() {
        let mut rows = fixture_rows();
        // Second node named "a.txt" deeper in the tree
        rows.push(Node { id: 7, name: "a.txt".into(), node_type: NodeType::File, parent_id: Some(4) });

        let model = TreeModel::build(&rows);
        // DFS reaches id 2 (direct child of first root) before id 7
        assert_eq!(model.find_by_name("a.txt").unwrap().id, 2);
        // Case-sensitive
        assert!(model.find_by_name("A.TXT").is_none());
    }

    #[test]
    fn test_find_nodes_by_type() {
        let model = TreeModel::build(&fixture_rows());
        let folders: Vec<i64> = model
            .find_nodes_by_type(NodeType::Folder)
            .iter()
            .map(|n| n.id)
            .collect();
        assert_eq!(folders, vec![1, 4, 6]);

        let files = model.find_nodes_by_type(NodeType::File);
        assert_eq!(files.len(), 3);
    }

    #[test]
    fn test_add_node_to_root_and_parent() {
        let mut model = TreeModel::build(&fixture_rows());

        model.add_node(TreeNode::leaf(20, "new-root", NodeType::Folder), None);
        assert_eq!(model.roots().len(), 3);

        model.add_node(TreeNode::leaf(21, "d.txt", NodeType::File), Some(4));
        assert_eq!(model.find_by_id(4).unwrap().children.len(), 2);
    }

    #[test]
    fn test_add_node_missing_parent_is_noop() {
        let mut model = TreeModel::build(&fixture_rows());
        let before = model.len();

        model.add_node(TreeNode::leaf(21, "d.txt", NodeType::File), Some(1234));
        assert_eq!(model.len(), before);
    }

    #[test]
    fn test_remove_subtree_removes_descendants() {
        let mut model = TreeModel::build(&fixture_rows());

        assert!(model.remove_subtree(4));
        assert!(model.find_by_id(4).is_none());
        assert!(model.find_by_id(5).is_none(), "descendant must go with the subtree");
        assert_eq!(model.len(), 4);

        assert!(!model.remove_subtree(4), "second removal is a miss");
    }

    #[test]
    fn test_flatten_roundtrip_preserves_rows() {
        let rows = fixture_rows();
        let model = TreeModel::build(&rows);
        let mut flattened = model.flatten();
        let mut original = rows;

        flattened.sort_by_key(|n| n.id);
        original.sort_by_key(|n| n.id);
        assert_eq!(flattened, original);
    }

    #[test]
    fn test_flatten_reassigns_parent_links_after_mutation() {
        let mut model = TreeModel::build(&fixture_rows());
        model.add_node(TreeNode::leaf(30, "moved.txt", NodeType::File), Some(6));

        let rows = model.flatten();
        let moved = rows.iter().find(|n| n.id == 30).unwrap();
        assert_eq!(moved.parent_id, Some(6));
    }

    #[test]
    fn test_snapshot_serialization_shape() {
        let model = TreeModel::build(&fixture_rows());
        let json = serde_json::to_value(model.roots()).unwrap();

        assert_eq!(json[0]["name"], "root");
        assert_eq!(json[0]["type"], "folder");
        assert_eq!(json[0]["children"][0]["name"], "a.txt");
        assert_eq!(json[1]["children"], serde_json::json!([]));
    }
}
