//! Principal corpus loading
//!
//! One Graph Store read per tenant yields every (principal, assignment,
//! scope, permission fragments, kind) row. Scopes and all four permission
//! pattern lists are compiled here, once per assignment, so the cost is
//! amortized across every relationship definition evaluated in the run.

use crate::error::Result;
use crate::pattern::{CompiledPattern, PatternCache};
use crate::scope::resolve_scope;
use nimbus_graph::{GraphStore, PermissionFragment};
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// The four compiled pattern lists of a role definition.
///
/// A fixed record: every category is present, possibly empty. Fragments
/// belonging to one assignment merge with set union per category before
/// compilation.
#[derive(Debug, Clone)]
pub struct PermissionSet {
    /// Allowed management-plane actions
    pub actions: Vec<CompiledPattern>,
    /// Denied management-plane actions
    pub not_actions: Vec<CompiledPattern>,
    /// Allowed data-plane actions
    pub data_actions: Vec<CompiledPattern>,
    /// Denied data-plane actions
    pub not_data_actions: Vec<CompiledPattern>,
}

impl PermissionSet {
    /// Merge fragments and compile every category through the cache.
    pub fn from_fragments(fragments: &[PermissionFragment], cache: &PatternCache) -> Self {
        Self {
            actions: compile_union(fragments.iter().map(|f| &f.actions), cache),
            not_actions: compile_union(fragments.iter().map(|f| &f.not_actions), cache),
            data_actions: compile_union(fragments.iter().map(|f| &f.data_actions), cache),
            not_data_actions: compile_union(fragments.iter().map(|f| &f.not_data_actions), cache),
        }
    }
}

/// One role assignment with its scope and permissions compiled.
#[derive(Debug, Clone)]
pub struct CompiledAssignment {
    /// Compiled canonical scope pattern
    pub scope: CompiledPattern,
    /// Compiled permission statement
    pub permissions: PermissionSet,
    /// Raw principal kind string from the assignment
    pub principal_kind: String,
}

/// Every principal's compiled assignments, keyed principal id → assignment id.
pub type PrincipalCorpus = HashMap<String, HashMap<String, CompiledAssignment>>;

/// Load and compile the full corpus for a tenant.
///
/// Read failures propagate; the orchestrator never evaluates against a
/// partial corpus. Assignments with an empty scope are skipped with a
/// warning instead of being compiled into something unmatchable.
pub async fn load_corpus(
    store: &dyn GraphStore,
    tenant_id: &str,
    cache: &PatternCache,
) -> Result<PrincipalCorpus> {
    let rows = store.assignment_rows(tenant_id).await?;
    debug!(tenant_id, rows = rows.len(), "loaded role assignment rows");

    let mut corpus: PrincipalCorpus = HashMap::new();
    for row in rows {
        if row.scope.is_empty() {
            warn!(
                assignment_id = %row.assignment_id,
                principal_id = %row.principal_id,
                "role assignment has an empty scope, skipping"
            );
            continue;
        }

        let scope = cache.compile(&resolve_scope(&row.scope));
        let permissions = PermissionSet::from_fragments(&row.fragments, cache);

        corpus.entry(row.principal_id).or_default().insert(
            row.assignment_id,
            CompiledAssignment {
                scope,
                permissions,
                principal_kind: row.principal_kind,
            },
        );
    }

    debug!(tenant_id, principals = corpus.len(), "compiled principal corpus");
    Ok(corpus)
}

/// Union the given lists in order, dropping duplicates, and compile each.
fn compile_union<'a>(
    lists: impl Iterator<Item = &'a Vec<String>>,
    cache: &PatternCache,
) -> Vec<CompiledPattern> {
    let mut seen = HashSet::new();
    let mut compiled = Vec::new();
    for list in lists {
        for item in list {
            if seen.insert(item.as_str()) {
                compiled.push(cache.compile(item));
            }
        }
    }
    compiled
}
