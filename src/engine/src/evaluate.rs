//! The authorization decision procedure
//!
//! Pure functions over the immutable compiled corpus; safe to fan out across
//! (resource, principal) pairs without synchronization.
//!
//! Deny here is assignment-scoped: a role definition's not-actions and
//! not-data-actions veto only grants from the same assignment, never grants
//! a principal holds through other assignments. This mirrors the source
//! platform's evaluation semantics and is pinned by tests.

use crate::corpus::{CompiledAssignment, PrincipalCorpus};
use crate::pattern::CompiledPattern;
use crate::types::Grant;
use std::collections::HashMap;
use tracing::trace;

/// True if any pattern in the list fully matches the candidate.
fn any_match(patterns: &[CompiledPattern], candidate: &str) -> bool {
    patterns.iter().any(|pattern| pattern.matches(candidate))
}

/// Can this single assignment grant any of the required permissions on the
/// resource?
///
/// The assignment's scope must fully match the resource id. Each required
/// permission is then tried in turn: a deny-action match blocks the action
/// path, otherwise an allow-action match grants; the data-action pair is
/// symmetric. Any one permission being grantable is sufficient.
pub fn assignment_grants(
    assignment: &CompiledAssignment,
    resource_id: &str,
    permissions: &[String],
) -> bool {
    if !assignment.scope.matches(resource_id) {
        return false;
    }

    for permission in permissions {
        let set = &assignment.permissions;

        if !any_match(&set.not_actions, permission) && any_match(&set.actions, permission) {
            return true;
        }

        if !any_match(&set.not_data_actions, permission)
            && any_match(&set.data_actions, permission)
        {
            return true;
        }
    }

    false
}

/// Is the principal allowed any of the required permissions on the resource?
///
/// Disjunction across the principal's assignments: any one assignment
/// granting access is sufficient. Order does not affect the result.
pub fn principal_allowed(
    assignments: &HashMap<String, CompiledAssignment>,
    resource_id: &str,
    permissions: &[String],
) -> bool {
    assignments
        .values()
        .any(|assignment| assignment_grants(assignment, resource_id, permissions))
}

/// Evaluate the full resources × principals cross product.
pub fn calculate_grants(
    corpus: &PrincipalCorpus,
    resource_ids: &[String],
    permissions: &[String],
) -> Vec<Grant> {
    let mut grants = Vec::new();

    for resource_id in resource_ids {
        for (principal_id, assignments) in corpus {
            if principal_allowed(assignments, resource_id, permissions) {
                // Kind is uniform across a principal's assignments
                let principal_kind = assignments
                    .values()
                    .next()
                    .map(|assignment| assignment.principal_kind.clone())
                    .unwrap_or_default();

                trace!(%principal_id, %resource_id, "access granted");
                grants.push(Grant {
                    principal_id: principal_id.clone(),
                    resource_id: resource_id.clone(),
                    principal_kind,
                });
            }
        }
    }

    grants
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::PermissionSet;
    use crate::pattern::PatternCache;
    use crate::scope::resolve_scope;
    use nimbus_graph::PermissionFragment;

    const RESOURCE: &str = "/subscriptions/sub1/resourceGroups/rg1/providers/Sql/servers/s1";

    fn assignment(
        scope: &str,
        actions: &[&str],
        not_actions: &[&str],
        data_actions: &[&str],
        not_data_actions: &[&str],
    ) -> CompiledAssignment {
        let cache = PatternCache::new();
        let fragment = PermissionFragment {
            actions: actions.iter().map(|s| s.to_string()).collect(),
            not_actions: not_actions.iter().map(|s| s.to_string()).collect(),
            data_actions: data_actions.iter().map(|s| s.to_string()).collect(),
            not_data_actions: not_data_actions.iter().map(|s| s.to_string()).collect(),
        };
        CompiledAssignment {
            scope: cache.compile(&resolve_scope(scope)),
            permissions: PermissionSet::from_fragments(&[fragment], &cache),
            principal_kind: "User".to_string(),
        }
    }

    fn perms(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_scope_gates_the_assignment() {
        let a = assignment("/subscriptions/sub2", &["*"], &[], &[], &[]);
        assert!(!assignment_grants(&a, RESOURCE, &perms(&["Sql/servers/read"])));

        let a = assignment("/subscriptions/sub1", &["*"], &[], &[], &[]);
        assert!(assignment_grants(&a, RESOURCE, &perms(&["Sql/servers/read"])));
    }

    #[test]
    fn test_deny_overrides_allow_within_one_assignment() {
        let a = assignment("/subscriptions/sub1", &["iam:*"], &["iam:Create*"], &[], &[]);
        assert!(!assignment_grants(&a, RESOURCE, &perms(&["iam:CreateRole"])));
        assert!(assignment_grants(&a, RESOURCE, &perms(&["iam:DeleteRole"])));
    }

    #[test]
    fn test_data_action_path_is_symmetric() {
        let a = assignment(
            "/subscriptions/sub1",
            &[],
            &[],
            &["Storage/blobs/*"],
            &["Storage/blobs/delete"],
        );
        assert!(assignment_grants(&a, RESOURCE, &perms(&["Storage/blobs/read"])));
        assert!(!assignment_grants(&a, RESOURCE, &perms(&["Storage/blobs/delete"])));
    }

    #[test]
    fn test_deny_on_action_path_leaves_data_path_open() {
        // not_actions only veto the action path; a data-action allow for the
        // same permission string still grants.
        let a = assignment(
            "/subscriptions/sub1",
            &["Storage/blobs/read"],
            &["Storage/blobs/read"],
            &["Storage/blobs/read"],
            &[],
        );
        assert!(assignment_grants(&a, RESOURCE, &perms(&["Storage/blobs/read"])));
    }

    #[test]
    fn test_any_required_permission_suffices() {
        let a = assignment("/subscriptions/sub1", &["Sql/servers/read"], &[], &[], &[]);
        assert!(assignment_grants(
            &a,
            RESOURCE,
            &perms(&["Sql/servers/delete", "Sql/servers/read"])
        ));
        assert!(!assignment_grants(&a, RESOURCE, &perms(&["Sql/servers/delete"])));
    }

    #[test]
    fn test_grant_disjunction_across_assignments() {
        let mut assignments = HashMap::new();
        assignments.insert(
            "a1".to_string(),
            assignment("/subscriptions/sub1", &["Compute/vm/start"], &[], &[], &[]),
        );
        assignments.insert(
            "a2".to_string(),
            assignment("/subscriptions/sub1", &["Sql/servers/read"], &[], &[], &[]),
        );

        assert!(principal_allowed(
            &assignments,
            RESOURCE,
            &perms(&["Sql/servers/read"])
        ));
    }

    #[test]
    fn test_deny_is_scoped_to_its_own_assignment() {
        // One assignment denies the permission it would otherwise allow; a
        // second assignment allows it without any deny. The principal is
        // granted: the first assignment's deny does not reach across.
        let mut assignments = HashMap::new();
        assignments.insert(
            "a1".to_string(),
            assignment(
                "/subscriptions/sub1",
                &["Sql/*"],
                &["Sql/servers/read"],
                &[],
                &[],
            ),
        );
        assignments.insert(
            "a2".to_string(),
            assignment("/subscriptions/sub1", &["Sql/servers/read"], &[], &[], &[]),
        );

        assert!(principal_allowed(
            &assignments,
            RESOURCE,
            &perms(&["Sql/servers/read"])
        ));
    }

    #[test]
    fn test_cross_product_and_kind_propagation() {
        let mut corpus: PrincipalCorpus = HashMap::new();
        let mut p1 = HashMap::new();
        p1.insert(
            "a1".to_string(),
            assignment("/subscriptions/sub1", &["Sql/servers/read"], &[], &[], &[]),
        );
        corpus.insert("p1".to_string(), p1);

        let mut p2 = HashMap::new();
        p2.insert(
            "a2".to_string(),
            assignment("/subscriptions/sub2", &["Sql/servers/read"], &[], &[], &[]),
        );
        corpus.insert("p2".to_string(), p2);

        let resources = vec![RESOURCE.to_string()];
        let grants = calculate_grants(&corpus, &resources, &perms(&["Sql/servers/read"]));

        assert_eq!(grants.len(), 1);
        assert_eq!(grants[0].principal_id, "p1");
        assert_eq!(grants[0].resource_id, RESOURCE);
        assert_eq!(grants[0].principal_kind, "User");
    }

    #[test]
    fn test_empty_permission_lists_grant_nothing() {
        let a = assignment("/subscriptions/sub1", &[], &[], &[], &[]);
        assert!(!assignment_grants(&a, RESOURCE, &perms(&["Sql/servers/read"])));
    }
}
