//! # Nimbus Graph Store boundary
//!
//! Row and edge types plus the [`GraphStore`] trait the resolution engine
//! consumes. Concrete backends (a graph database client, typically) live
//! behind this trait; [`InMemoryGraphStore`] is the reference implementation
//! used by tests.

pub mod error;
pub mod memory;
pub mod store;
pub mod types;

pub use error::{GraphError, Result};
pub use memory::InMemoryGraphStore;
pub use store::GraphStore;
pub use types::{AssignmentRow, PermissionFragment, RelationshipLink, RelationshipSpec};
