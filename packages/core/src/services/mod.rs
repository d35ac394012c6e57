//! Service Layer
//!
//! Orchestration over the lower layers: [`TreeService`] keeps the
//! published tree and graph consistent with the store and owns the
//! rebuild/publish cycle.

pub mod error;
pub mod tree_service;

pub use error::TreeServiceError;
pub use tree_service::TreeService;
