//! Scope canonicalization
//!
//! Role-assignment scopes follow the hierarchical pattern
//! `/subscriptions/{sub}/resourceGroups/{rg}/providers/{provider}/{type}/{name}`.
//! A scope containing the `/providers/` segment already names a concrete
//! resource; anything shorter is a container and must also match everything
//! nested under it.

/// Path segment that marks a resource-level scope.
const RESOURCE_MARKER: &str = "/providers/";

/// Canonicalize a scope string before pattern compilation.
///
/// Resource-level scopes are returned unchanged; container scopes get a
/// trailing `/*` so the compiled pattern covers the scope and its subtree.
/// Idempotent for scopes that already name a concrete resource.
pub fn resolve_scope(scope: &str) -> String {
    if scope.contains(RESOURCE_MARKER) {
        return scope.to_string();
    }

    let mut resolved = scope.to_string();
    if !resolved.ends_with('/') {
        resolved.push('/');
    }
    resolved.push('*');
    resolved
}
