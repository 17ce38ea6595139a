//! Grant materialization and stale-edge cleanup
//!
//! Grants become `(principal)-[relationship_name]->(resource)` edges grouped
//! by principal kind, stamped with the run's update tag. Cleanup runs for
//! every kind in the closed set on every run, even with zero new grants, so
//! revoked access always disappears.

use crate::config::RelationshipDefinition;
use crate::error::Result;
use crate::types::{Grant, PrincipalKind};
use nimbus_graph::{GraphStore, RelationshipLink, RelationshipSpec};
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Group grants by principal kind, dropping unknown kinds with a warning.
pub(crate) fn group_by_kind(grants: &[Grant]) -> HashMap<PrincipalKind, Vec<RelationshipLink>> {
    let mut grouped: HashMap<PrincipalKind, Vec<RelationshipLink>> = HashMap::new();

    for grant in grants {
        let Some(kind) = PrincipalKind::from_raw(&grant.principal_kind) else {
            warn!(
                principal_kind = %grant.principal_kind,
                principal_id = %grant.principal_id,
                "unknown principal kind, dropping grant"
            );
            continue;
        };

        grouped
            .entry(kind)
            .or_default()
            .push(RelationshipLink::new(&grant.principal_id, &grant.resource_id));
    }

    grouped
}

/// Write the grants for one relationship definition and prune stale edges.
pub async fn materialize(
    store: &dyn GraphStore,
    definition: &RelationshipDefinition,
    grants: &[Grant],
    tenant_id: &str,
    update_tag: i64,
) -> Result<()> {
    let grouped = group_by_kind(grants);

    for (kind, links) in &grouped {
        let spec = RelationshipSpec::new(
            kind.node_label(),
            &definition.target_label,
            &definition.relationship_name,
        );

        info!(
            "Loading {} {} relationships for {} -> {}",
            links.len(),
            definition.relationship_name,
            kind.node_label(),
            definition.target_label
        );

        store
            .upsert_relationships(&spec, links, tenant_id, update_tag)
            .await?;
    }

    // Cleanup for every kind, every run, even with zero new grants
    for kind in PrincipalKind::ALL {
        let spec = RelationshipSpec::new(
            kind.node_label(),
            &definition.target_label,
            &definition.relationship_name,
        );

        let removed = store
            .prune_stale_relationships(&spec, tenant_id, update_tag)
            .await?;
        if removed > 0 {
            debug!(
                removed,
                relationship_name = %definition.relationship_name,
                source_label = kind.node_label(),
                "pruned stale relationships"
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use nimbus_graph::InMemoryGraphStore;

    fn definition() -> RelationshipDefinition {
        RelationshipDefinition {
            target_label: "SqlServer".to_string(),
            permissions: vec!["Sql/servers/read".to_string()],
            relationship_name: "CAN_READ".to_string(),
        }
    }

    fn grant(principal_id: &str, resource_id: &str, kind: &str) -> Grant {
        Grant {
            principal_id: principal_id.to_string(),
            resource_id: resource_id.to_string(),
            principal_kind: kind.to_string(),
        }
    }

    #[test]
    fn test_grouping_drops_unknown_kinds() {
        let grants = vec![
            grant("p1", "r1", "User"),
            grant("p2", "r1", "Group"),
            grant("p3", "r1", "ManagedIdentity"),
            grant("p4", "r1", "ServicePrincipal"),
        ];

        let grouped = group_by_kind(&grants);
        assert_eq!(grouped.len(), 3);
        assert_eq!(grouped[&PrincipalKind::User].len(), 1);
        assert_eq!(grouped[&PrincipalKind::Group].len(), 1);
        assert_eq!(grouped[&PrincipalKind::ServicePrincipal].len(), 1);
    }

    #[tokio::test]
    async fn test_materialize_writes_per_kind_edges() {
        let store = InMemoryGraphStore::new();
        let grants = vec![grant("p1", "r1", "User"), grant("g1", "r1", "Group")];

        materialize(&store, &definition(), &grants, "tenant-1", 100)
            .await
            .unwrap();

        let edges = store.edges_for("tenant-1", "CAN_READ").await;
        assert_eq!(edges.len(), 2);
        assert!(edges.contains(&("p1".to_string(), "r1".to_string(), 100)));
        assert!(edges.contains(&("g1".to_string(), "r1".to_string(), 100)));
    }

    #[tokio::test]
    async fn test_cleanup_runs_even_with_zero_grants() {
        let store = InMemoryGraphStore::new();

        // First run grants p1
        materialize(
            &store,
            &definition(),
            &[grant("p1", "r1", "User")],
            "tenant-1",
            100,
        )
        .await
        .unwrap();
        assert_eq!(store.edges_for("tenant-1", "CAN_READ").await.len(), 1);

        // Second run produces no grants; the stale edge must still go
        materialize(&store, &definition(), &[], "tenant-1", 200)
            .await
            .unwrap();
        assert!(store.edges_for("tenant-1", "CAN_READ").await.is_empty());
    }

    #[tokio::test]
    async fn test_cleanup_is_scoped_to_the_relationship_name() {
        let store = InMemoryGraphStore::new();
        let mut manage = definition();
        manage.relationship_name = "CAN_MANAGE".to_string();

        materialize(
            &store,
            &manage,
            &[grant("p1", "r1", "User")],
            "tenant-1",
            100,
        )
        .await
        .unwrap();

        // A later CAN_READ run must not prune CAN_MANAGE edges
        materialize(&store, &definition(), &[], "tenant-1", 200)
            .await
            .unwrap();
        assert_eq!(store.edges_for("tenant-1", "CAN_MANAGE").await.len(), 1);
    }
}
