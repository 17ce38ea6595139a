//! Row and edge types exchanged with the Graph Store

use serde::{Deserialize, Serialize};

/// One permission statement fragment attached to a role definition.
///
/// A role definition may be assembled from several fragments; the engine
/// merges all fragments of an assignment with list union per category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionFragment {
    /// Allowed management-plane action patterns
    #[serde(default)]
    pub actions: Vec<String>,

    /// Denied management-plane action patterns
    #[serde(default)]
    pub not_actions: Vec<String>,

    /// Allowed data-plane action patterns
    #[serde(default)]
    pub data_actions: Vec<String>,

    /// Denied data-plane action patterns
    #[serde(default)]
    pub not_data_actions: Vec<String>,
}

/// One (principal, assignment) row returned by the per-tenant read query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentRow {
    /// Principal the assignment binds
    pub principal_id: String,

    /// Role assignment identifier
    pub assignment_id: String,

    /// Hierarchical scope the assignment applies at
    pub scope: String,

    /// Raw principal kind string as stored on the assignment
    pub principal_kind: String,

    /// Permission fragments of the assignment's role definition
    pub fragments: Vec<PermissionFragment>,
}

/// Write-time edge schema: `(source_label)-[rel_name]->(target_label)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RelationshipSpec {
    /// Node label of the edge source (a principal label)
    pub source_label: String,

    /// Node label of the edge target (the definition's target label)
    pub target_label: String,

    /// Relationship name, e.g. `CAN_READ`
    pub rel_name: String,
}

impl RelationshipSpec {
    /// Create a new edge schema
    pub fn new(
        source_label: impl Into<String>,
        target_label: impl Into<String>,
        rel_name: impl Into<String>,
    ) -> Self {
        Self {
            source_label: source_label.into(),
            target_label: target_label.into(),
            rel_name: rel_name.into(),
        }
    }
}

/// One edge instance to upsert under a [`RelationshipSpec`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RelationshipLink {
    /// Source node id (principal id)
    pub source_id: String,

    /// Target node id (resource id)
    pub target_id: String,
}

impl RelationshipLink {
    /// Create a new edge instance
    pub fn new(source_id: impl Into<String>, target_id: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
            target_id: target_id.into(),
        }
    }
}
