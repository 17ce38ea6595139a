//! # Nimbus Access-Policy Resolution Engine
//!
//! Decides, per cloud tenant, which identity principals may perform which
//! operations against which resources, from declarative role-assignment data
//! and a YAML document of relationship definitions, and materializes the
//! result as freshness-tagged graph edges.
//!
//! ## Pipeline
//!
//! ```text
//! Definitions (YAML) → Corpus load → Scope/Pattern compile → Evaluate → Materialize
//!                          │                                               │
//!                     [GraphStore read]                          [GraphStore write + prune]
//! ```
//!
//! ## Example
//!
//! ```
//! use nimbus_engine::sync;
//! use nimbus_graph::InMemoryGraphStore;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = InMemoryGraphStore::new();
//!
//! // No definitions file configured: the run is a clean no-op.
//! sync(&store, "tenant-1", 1, None).await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod corpus;
pub mod error;
pub mod evaluate;
pub mod materialize;
pub mod pattern;
pub mod scope;
pub mod sync;
pub mod types;

// Re-export commonly used types
pub use config::{load_definitions, RawDefinition, RelationshipDefinition};
pub use corpus::{load_corpus, CompiledAssignment, PermissionSet, PrincipalCorpus};
pub use error::{EngineError, Result};
pub use evaluate::{calculate_grants, principal_allowed};
pub use pattern::{CompiledPattern, PatternCache};
pub use scope::resolve_scope;
pub use sync::sync;
pub use types::{Grant, PrincipalKind};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
