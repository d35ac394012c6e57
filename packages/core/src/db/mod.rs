//! Database Layer
//!
//! This module provides persistence for the flat tree rows:
//!
//! - `DatabaseService` - libsql connection management and schema
//! - `TreeStore` - storage trait the service layer depends on
//! - `SqliteStore` - libsql-backed implementation
//! - `MemoryStore` - in-memory implementation for tests

pub mod database;
pub mod error;
pub mod memory_store;
pub mod sqlite_store;
pub mod tree_store;

pub use database::DatabaseService;
pub use error::{DatabaseError, StoreError};
pub use memory_store::MemoryStore;
pub use sqlite_store::SqliteStore;
pub use tree_store::TreeStore;
