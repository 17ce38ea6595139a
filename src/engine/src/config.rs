//! Relationship definition configuration
//!
//! Definitions arrive as a YAML list; each entry names a target resource
//! label, the permission strings that should produce the edge, and the edge's
//! relationship name:
//!
//! ```yaml
//! - target_label: SqlServer
//!   permissions:
//!     - Sql/servers/read
//!     - Sql/servers/databases/read
//!   relationship_name: CAN_READ
//! ```

use crate::error::{EngineError, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::warn;

/// A definition as parsed, before validation. Every field optional so one
/// malformed entry skips only itself.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawDefinition {
    /// Node label of the target resource type
    #[serde(default)]
    pub target_label: Option<String>,

    /// Required permission strings, in evaluation order
    #[serde(default)]
    pub permissions: Option<Vec<String>>,

    /// Relationship name for the produced edges
    #[serde(default)]
    pub relationship_name: Option<String>,
}

impl RawDefinition {
    /// Validate into the strict form, rejecting entries with missing fields.
    pub fn validate(self) -> Result<RelationshipDefinition> {
        let target_label = self
            .target_label
            .ok_or_else(|| EngineError::InvalidDefinition("missing target_label".to_string()))?;
        let permissions = self
            .permissions
            .ok_or_else(|| EngineError::InvalidDefinition("missing permissions".to_string()))?;
        let relationship_name = self.relationship_name.ok_or_else(|| {
            EngineError::InvalidDefinition("missing relationship_name".to_string())
        })?;

        Ok(RelationshipDefinition {
            target_label,
            permissions,
            relationship_name,
        })
    }
}

/// A validated relationship definition. Immutable for the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationshipDefinition {
    /// Node label of the target resource type
    pub target_label: String,

    /// Required permission strings
    pub permissions: Vec<String>,

    /// Relationship name for the produced edges
    pub relationship_name: String,
}

/// Load the definitions document.
///
/// A missing file is the expected "module not configured" outcome: it is
/// logged and yields an empty list rather than an error. Unparseable YAML is
/// an error for the caller to report.
pub fn load_definitions(path: &Path) -> Result<Vec<RawDefinition>> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            warn!(
                path = %path.display(),
                "relationship definitions file not found, skipping"
            );
            return Ok(Vec::new());
        }
        Err(err) => return Err(err.into()),
    };

    let definitions: Option<Vec<RawDefinition>> = serde_yaml::from_str(&raw)?;
    Ok(definitions.unwrap_or_default())
}
