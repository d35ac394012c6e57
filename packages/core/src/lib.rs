//! GraphDirectory Core Logic Layer
//!
//! This crate provides the tree persistence, graph projection, and service
//! orchestration for the GraphDirectory file/folder visualizer.
//!
//! # Architecture
//!
//! - **Flat storage**: One `tree` row per file/folder with a parent link
//! - **Nested projection**: `TreeModel` rebuilds the hierarchy from rows
//! - **Positioned graph**: `GraphProjection` assigns deterministic 2D
//!   coordinates; `VisibilityWindow` pages over root subtrees
//! - **libsql/Turso**: Embedded SQLite-compatible database
//!
//! # Modules
//!
//! - [`models`] - Data structures (Node, TreeModel)
//! - [`graph`] - Graph projection, layout, and paging
//! - [`services`] - TreeService orchestration and snapshots
//! - [`db`] - Database layer with libsql integration
//! - [`cache`] - In-memory content cache
//! - [`logging`] - tracing subscriber setup

pub mod cache;
pub mod db;
pub mod graph;
pub mod logging;
pub mod models;
pub mod services;

// Re-export commonly used types
pub use graph::*;
pub use models::*;
pub use services::*;
