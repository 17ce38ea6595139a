//! The Graph Store trait consumed by the resolution engine

use crate::error::Result;
use crate::types::{AssignmentRow, RelationshipLink, RelationshipSpec};
use async_trait::async_trait;

/// Read and write capabilities of the backing graph.
///
/// Retry, timeout, and authentication policy belong to implementations of
/// this trait; the engine treats every error as fatal for the tenant run.
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Fetch every (principal, assignment, scope, permission fragments, kind)
    /// row for known identity principals under a tenant.
    async fn assignment_rows(&self, tenant_id: &str) -> Result<Vec<AssignmentRow>>;

    /// Fetch the ids of all resources with the given node label under a tenant.
    async fn resource_ids(&self, tenant_id: &str, label: &str) -> Result<Vec<String>>;

    /// Upsert edges for the given schema under a tenant, stamping each edge
    /// with `update_tag`. Re-upserting an existing edge refreshes its tag.
    async fn upsert_relationships(
        &self,
        spec: &RelationshipSpec,
        links: &[RelationshipLink],
        tenant_id: &str,
        update_tag: i64,
    ) -> Result<()>;

    /// Delete edges matching the schema under the tenant whose tag is older
    /// than `update_tag`. Returns the number of edges removed.
    async fn prune_stale_relationships(
        &self,
        spec: &RelationshipSpec,
        tenant_id: &str,
        update_tag: i64,
    ) -> Result<usize>;
}
