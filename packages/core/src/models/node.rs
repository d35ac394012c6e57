//! Flat Node Data Structures
//!
//! This module defines the persisted `Node` row and its validation rules.
//!
//! # Architecture
//!
//! - **Flat form**: one row per file/folder, linked to its parent by id
//! - **Two id spaces**: the persisted `id` here is storage identity; the
//!   rendering layer assigns its own build-order ids (see [`crate::graph`])
//! - **Acyclic parents**: every non-null `parent_id` must reference an
//!   existing row, and following parents must terminate at a root
//!
//! # Examples
//!
//! ```rust
//! use graphdir_core::models::{Node, NodeType};
//!
//! let root = Node {
//!     id: 1,
//!     name: "root".to_string(),
//!     node_type: NodeType::Folder,
//!     parent_id: None,
//! };
//! let file = Node {
//!     id: 2,
//!     name: "a.txt".to_string(),
//!     node_type: NodeType::File,
//!     parent_id: Some(root.id),
//! };
//! assert!(file.node_type.is_file());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors for node input
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid node type: {0}")]
    InvalidNodeType(String),

    #[error("Invalid parent reference: {0}")]
    InvalidParent(i64),
}

/// Kind of a tree entry: a leaf file or a folder that may hold children.
///
/// Serialized as the lowercase strings `"file"` / `"folder"` to match the
/// `type` column of the `tree` table and the JSON snapshot format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    File,
    Folder,
}

impl NodeType {
    /// Parse the persisted column value.
    ///
    /// Returns `ValidationError::InvalidNodeType` for anything other than
    /// `"file"` or `"folder"` (exact, lowercase).
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        match value {
            "file" => Ok(NodeType::File),
            "folder" => Ok(NodeType::Folder),
            other => Err(ValidationError::InvalidNodeType(other.to_string())),
        }
    }

    /// The persisted column value for this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::File => "file",
            NodeType::Folder => "folder",
        }
    }

    pub fn is_file(&self) -> bool {
        matches!(self, NodeType::File)
    }

    pub fn is_folder(&self) -> bool {
        matches!(self, NodeType::Folder)
    }
}

/// Flat, persisted form of a tree entry.
///
/// # Fields
///
/// - `id`: unique, stable storage identity (AUTOINCREMENT)
/// - `name`: display name, non-empty (names need not be unique)
/// - `node_type`: file or folder
/// - `parent_id`: parent row id, `None` for root nodes
///
/// # Invariants
///
/// A non-null `parent_id` must reference an existing row and the parent
/// graph must be acyclic. Rows violating this are skipped (with a warning)
/// when the nested tree is built, never fatal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// Unique storage identity
    pub id: i64,

    /// Display name (non-empty)
    pub name: String,

    /// File or folder
    #[serde(rename = "type")]
    pub node_type: NodeType,

    /// Parent row id (`None` for roots)
    pub parent_id: Option<i64>,
}

/// Input for inserting a new node; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewNode {
    pub name: String,

    #[serde(rename = "type")]
    pub node_type: NodeType,

    pub parent_id: Option<i64>,
}

impl NewNode {
    /// Create a new node draft.
    pub fn new(name: impl Into<String>, node_type: NodeType, parent_id: Option<i64>) -> Self {
        Self {
            name: name.into(),
            node_type,
            parent_id,
        }
    }

    /// Validate required fields before handing the draft to a store.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::MissingField` when `name` is empty.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.is_empty() {
            return Err(ValidationError::MissingField("name".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_type_parse_roundtrip() {
        assert_eq!(NodeType::parse("file").unwrap(), NodeType::File);
        assert_eq!(NodeType::parse("folder").unwrap(), NodeType::Folder);
        assert_eq!(NodeType::File.as_str(), "file");
        assert_eq!(NodeType::Folder.as_str(), "folder");
    }

    #[test]
    fn test_node_type_parse_rejects_unknown() {
        let result = NodeType::parse("symlink");
        assert!(matches!(result, Err(ValidationError::InvalidNodeType(_))));

        // Exact match only - no case folding
        assert!(NodeType::parse("File").is_err());
    }

    #[test]
    fn test_node_serialization_uses_wire_names() {
        let node = Node {
            id: 7,
            name: "docs".to_string(),
            node_type: NodeType::Folder,
            parent_id: Some(1),
        };

        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["name"], "docs");
        assert_eq!(json["type"], "folder");
        assert_eq!(json["parentId"], 1);
    }

    #[test]
    fn test_node_deserialization_null_parent() {
        let json = serde_json::json!({
            "id": 1,
            "name": "root",
            "type": "folder",
            "parentId": null
        });

        let node: Node = serde_json::from_value(json).unwrap();
        assert_eq!(node.parent_id, None);
        assert!(node.node_type.is_folder());
    }

    #[test]
    fn test_new_node_validation() {
        let draft = NewNode::new("a.txt", NodeType::File, Some(1));
        assert!(draft.validate().is_ok());

        let empty = NewNode::new("", NodeType::File, None);
        let result = empty.validate();
        assert!(result.is_err());
        match result.unwrap_err() {
            ValidationError::MissingField(field) => assert_eq!(field, "name"),
            other => panic!("Expected MissingField, got {:?}", other),
        }
    }
}
