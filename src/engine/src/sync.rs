//! Run orchestration
//!
//! Linear state machine per tenant run:
//! load configuration → (per definition: validate → evaluate → materialize).
//! The corpus is loaded once per run, before the definition loop, since it
//! does not depend on any definition. Configuration problems end the run
//! cleanly; Graph Store failures abort it.

use crate::config::load_definitions;
use crate::corpus::load_corpus;
use crate::error::Result;
use crate::evaluate::calculate_grants;
use crate::materialize::materialize;
use crate::pattern::PatternCache;
use nimbus_graph::GraphStore;
use std::path::Path;
use tracing::{info, warn};

/// Resolve and materialize every configured relationship for one tenant.
///
/// `definitions_file` unset, missing, or unreadable is the normal
/// "module not configured" outcome: reported, then a clean return. A store
/// read or write failure propagates without partial materialization.
pub async fn sync(
    store: &dyn GraphStore,
    tenant_id: &str,
    update_tag: i64,
    definitions_file: Option<&Path>,
) -> Result<()> {
    let Some(path) = definitions_file else {
        warn!("relationship definitions file not configured, skipping");
        return Ok(());
    };

    let raw_definitions = match load_definitions(path) {
        Ok(definitions) => definitions,
        Err(err) => {
            warn!(%err, path = %path.display(), "could not load relationship definitions, skipping run");
            return Ok(());
        }
    };

    if raw_definitions.is_empty() {
        info!(tenant_id, "no relationship definitions configured");
        return Ok(());
    }

    info!(
        tenant_id,
        definitions = raw_definitions.len(),
        "resolving access-policy relationships"
    );

    // Fresh per-run cache, shared across every definition's compilation
    let cache = PatternCache::new();
    let corpus = load_corpus(store, tenant_id, &cache).await?;

    for raw in raw_definitions {
        let definition = match raw.validate() {
            Ok(definition) => definition,
            Err(err) => {
                warn!(%err, "invalid relationship definition, skipping");
                continue;
            }
        };

        let resource_ids = store
            .resource_ids(tenant_id, &definition.target_label)
            .await?;

        info!(
            "Evaluating relationship '{}' for resource label '{}' ({} resources)",
            definition.relationship_name,
            definition.target_label,
            resource_ids.len()
        );

        let grants = calculate_grants(&corpus, &resource_ids, &definition.permissions);
        materialize(store, &definition, &grants, tenant_id, update_tag).await?;
    }

    info!(tenant_id, "completed access-policy relationship resolution");
    Ok(())
}
