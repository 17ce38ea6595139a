//! In-memory Graph Store implementation
//!
//! Reference backend honoring the freshness-tag upsert/prune contract.
//! Used by the engine's integration tests and by hosts that want to dry-run
//! an evaluation without a live graph database.

use crate::error::{GraphError, Result};
use crate::store::GraphStore;
use crate::types::{AssignmentRow, RelationshipLink, RelationshipSpec};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Full identity of one persisted edge.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct EdgeKey {
    tenant_id: String,
    source_label: String,
    target_label: String,
    rel_name: String,
    source_id: String,
    target_id: String,
}

/// In-memory graph store
pub struct InMemoryGraphStore {
    /// Assignment rows per tenant
    assignments: Arc<RwLock<HashMap<String, Vec<AssignmentRow>>>>,

    /// Resource ids per (tenant, label)
    resources: Arc<RwLock<HashMap<(String, String), Vec<String>>>>,

    /// Persisted edges with their freshness tag
    edges: Arc<RwLock<HashMap<EdgeKey, i64>>>,

    /// Fault injection: make reads fail (for upstream-error tests)
    fail_reads: AtomicBool,

    /// Fault injection: make writes fail
    fail_writes: AtomicBool,
}

impl InMemoryGraphStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            assignments: Arc::new(RwLock::new(HashMap::new())),
            resources: Arc::new(RwLock::new(HashMap::new())),
            edges: Arc::new(RwLock::new(HashMap::new())),
            fail_reads: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
        }
    }

    /// Seed assignment rows for a tenant
    pub async fn seed_assignments(&self, tenant_id: &str, rows: Vec<AssignmentRow>) {
        let mut assignments = self.assignments.write().await;
        assignments
            .entry(tenant_id.to_string())
            .or_default()
            .extend(rows);
    }

    /// Drop all assignment rows for a tenant (models an identity resync)
    pub async fn clear_assignments(&self, tenant_id: &str) {
        let mut assignments = self.assignments.write().await;
        assignments.remove(tenant_id);
    }

    /// Seed resource ids for a (tenant, label) pair
    pub async fn seed_resources(&self, tenant_id: &str, label: &str, ids: Vec<String>) {
        let mut resources = self.resources.write().await;
        resources
            .entry((tenant_id.to_string(), label.to_string()))
            .or_default()
            .extend(ids);
    }

    /// Make subsequent reads fail, to exercise fatal-error propagation
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make subsequent writes (upsert and prune) fail
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Total number of persisted edges
    pub async fn edge_count(&self) -> usize {
        self.edges.read().await.len()
    }

    /// All (source id, target id, tag) triples for a relationship name under a tenant
    pub async fn edges_for(&self, tenant_id: &str, rel_name: &str) -> Vec<(String, String, i64)> {
        let edges = self.edges.read().await;
        let mut found: Vec<(String, String, i64)> = edges
            .iter()
            .filter(|(key, _)| key.tenant_id == tenant_id && key.rel_name == rel_name)
            .map(|(key, tag)| (key.source_id.clone(), key.target_id.clone(), *tag))
            .collect();
        found.sort();
        found
    }

    fn check_reads(&self) -> Result<()> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(GraphError::Query("simulated read failure".to_string()));
        }
        Ok(())
    }

    fn check_writes(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(GraphError::Write("simulated write failure".to_string()));
        }
        Ok(())
    }
}

impl Default for InMemoryGraphStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GraphStore for InMemoryGraphStore {
    async fn assignment_rows(&self, tenant_id: &str) -> Result<Vec<AssignmentRow>> {
        self.check_reads()?;
        let assignments = self.assignments.read().await;
        Ok(assignments.get(tenant_id).cloned().unwrap_or_default())
    }

    async fn resource_ids(&self, tenant_id: &str, label: &str) -> Result<Vec<String>> {
        self.check_reads()?;
        let resources = self.resources.read().await;
        Ok(resources
            .get(&(tenant_id.to_string(), label.to_string()))
            .cloned()
            .unwrap_or_default())
    }

    async fn upsert_relationships(
        &self,
        spec: &RelationshipSpec,
        links: &[RelationshipLink],
        tenant_id: &str,
        update_tag: i64,
    ) -> Result<()> {
        self.check_writes()?;
        let mut edges = self.edges.write().await;
        for link in links {
            let key = EdgeKey {
                tenant_id: tenant_id.to_string(),
                source_label: spec.source_label.clone(),
                target_label: spec.target_label.clone(),
                rel_name: spec.rel_name.clone(),
                source_id: link.source_id.clone(),
                target_id: link.target_id.clone(),
            };
            edges.insert(key, update_tag);
        }
        Ok(())
    }

    async fn prune_stale_relationships(
        &self,
        spec: &RelationshipSpec,
        tenant_id: &str,
        update_tag: i64,
    ) -> Result<usize> {
        self.check_writes()?;
        let mut edges = self.edges.write().await;
        let before = edges.len();
        edges.retain(|key, tag| {
            let matches = key.tenant_id == tenant_id
                && key.source_label == spec.source_label
                && key.target_label == spec.target_label
                && key.rel_name == spec.rel_name;
            !(matches && *tag < update_tag)
        });
        Ok(before - edges.len())
    }
}
