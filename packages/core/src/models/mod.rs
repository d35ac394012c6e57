//! Data Models
//!
//! This module contains the core data structures for the GraphDirectory tree:
//!
//! - `Node` - flat, persisted file/folder row with a parent link
//! - `TreeModel` / `TreeNode` - in-memory nested representation
//!
//! The flat form mirrors the `tree` table exactly; the nested form is built
//! from it and owned exclusively by `TreeModel`.

mod node;
mod tree;

pub use node::{NewNode, Node, NodeType, ValidationError};
pub use tree::{TreeModel, TreeNode, MAX_TREE_DEPTH};
