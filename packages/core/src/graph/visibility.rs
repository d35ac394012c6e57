//! Visibility Window - Horizontal Paging over Root Subtrees
//!
//! The renderer shows one root subtree at a time; [`VisibilityWindow`]
//! tracks which one. Paging is clamped: `next` at the last page and
//! `previous` at the first are no-ops, while reads with an index that no
//! longer exists (roots were deleted underneath) fail strictly with
//! [`GraphError::PageOutOfRange`] so the caller can reset the window.

use super::projection::{GraphData, GraphNode};
use super::GraphError;
use crate::models::TreeNode;
use std::collections::HashSet;

/// Current page over the root subtrees.
///
/// Holds only the page index; the tree and graph it pages over are passed
/// into each read so the window never goes stale by holding references.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VisibilityWindow {
    page_index: usize,
}

impl VisibilityWindow {
    /// Window positioned at the first page.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    /// The root subtree the current page shows.
    ///
    /// # Errors
    ///
    /// Returns `GraphError::PageOutOfRange` when the index no longer names
    /// a root (fewer roots than when the window was positioned).
    pub fn current_subtree<'a>(&self, roots: &'a [TreeNode]) -> Result<&'a TreeNode, GraphError> {
        roots
            .get(self.page_index)
            .ok_or_else(|| GraphError::page_out_of_range(self.page_index, roots.len()))
    }

    /// Graph nodes reachable from the current page's root, in traversal
    /// order starting at the root.
    ///
    /// Walks the edge list depth-first with a visited guard, so a
    /// structurally damaged graph terminates rather than loops.
    ///
    /// # Errors
    ///
    /// Returns `GraphError::PageOutOfRange` when the graph has fewer roots
    /// than the page index requires.
    pub fn visible_nodes(&self, data: &GraphData) -> Result<Vec<GraphNode>, GraphError> {
        let root_ids = data.root_ids();
        let root_id = *root_ids
            .get(self.page_index)
            .ok_or_else(|| GraphError::page_out_of_range(self.page_index, root_ids.len()))?;

        let mut visible = Vec::new();
        let mut visited: HashSet<usize> = HashSet::new();
        let mut stack = vec![root_id];
        while let Some(id) = stack.pop() {
            if !visited.insert(id) {
                continue;
            }
            if let Some(node) = data.nodes.get(id) {
                visible.push(node.clone());
            }
            // Reverse so children pop in edge order
            for edge in data.edges.iter().rev() {
                if edge.source == id && !visited.contains(&edge.target) {
                    stack.push(edge.target);
                }
            }
        }
        Ok(visible)
    }

    /// Graph ids visible on the current page, for position recalculation.
    pub fn visible_ids(&self, data: &GraphData) -> Result<HashSet<usize>, GraphError> {
        Ok(self
            .visible_nodes(data)?
            .into_iter()
            .map(|node| node.id)
            .collect())
    }

    /// Advance to the next page; no-op at the last page.
    pub fn next(&mut self, root_count: usize) {
        if self.page_index + 1 < root_count {
            self.page_index += 1;
        }
    }

    /// Step back one page; no-op at the first page.
    pub fn previous(&mut self) {
        self.page_index = self.page_index.saturating_sub(1);
    }

    /// Reset to the first page.
    pub fn reset(&mut self) {
        self.page_index = 0;
    }

    /// Whether a previous page exists.
    pub fn show_left_arrow(&self) -> bool {
        self.page_index > 0
    }

    /// Whether a next page exists.
    pub fn show_right_arrow(&self, root_count: usize) -> bool {
        self.page_index + 1 < root_count
    }
}
