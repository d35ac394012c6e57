//! Graph Layer
//!
//! This module derives the flat, positioned node/edge representation that
//! the renderer consumes from the nested [`crate::models::TreeModel`]:
//!
//! - [`GraphProjection`] - tree → positioned nodes + edges, plus the
//!   incremental X recompute used when the visible set changes
//! - [`VisibilityWindow`] - horizontal paging over root subtrees
//!
//! Graph node ids live in their own id space (dense, 0-based, assigned in
//! build order) and are deliberately not the persisted row ids: rebuild
//! order stays decoupled from storage identity.

mod projection;
mod visibility;

pub use projection::{
    GraphData, GraphEdge, GraphNode, GraphProjection, DEFAULT_CANVAS_WIDTH, HORIZONTAL_SPACING,
    VERTICAL_SPACING,
};
pub use visibility::VisibilityWindow;

use thiserror::Error;

/// Graph layer errors
#[derive(Error, Debug)]
pub enum GraphError {
    /// Paging index outside `[0, root_count)`
    #[error("Page index {index} out of range for {root_count} root subtree(s)")]
    PageOutOfRange { index: usize, root_count: usize },
}

impl GraphError {
    /// Create a page out of range error
    pub fn page_out_of_range(index: usize, root_count: usize) -> Self {
        Self::PageOutOfRange { index, root_count }
    }
}
