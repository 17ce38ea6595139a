//! Core engine types

use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of identity principal kinds the engine writes edges for.
///
/// Raw kind strings from role assignments outside this set are rejected and
/// logged at materialization time, never silently coerced; adding a kind is
/// a compile-time-checked change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrincipalKind {
    /// A human user identity
    User,
    /// A group of identities
    Group,
    /// A workload identity
    ServicePrincipal,
}

impl PrincipalKind {
    /// Every kind, in the order cleanup iterates them
    pub const ALL: [PrincipalKind; 3] = [
        PrincipalKind::User,
        PrincipalKind::Group,
        PrincipalKind::ServicePrincipal,
    ];

    /// Map a raw kind string as stored on a role assignment
    pub fn from_raw(raw: &str) -> Option<Self> {
        match raw {
            "User" => Some(Self::User),
            "Group" => Some(Self::Group),
            "ServicePrincipal" => Some(Self::ServicePrincipal),
            _ => None,
        }
    }

    /// The principal node label used at edge write time
    pub fn node_label(&self) -> &'static str {
        match self {
            Self::User => "IdentityUser",
            Self::Group => "IdentityGroup",
            Self::ServicePrincipal => "IdentityServicePrincipal",
        }
    }
}

impl fmt::Display for PrincipalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::User => "User",
            Self::Group => "Group",
            Self::ServicePrincipal => "ServicePrincipal",
        };
        write!(f, "{}", name)
    }
}

/// A computed (principal, resource) authorization decision, prior to
/// persistence. The kind is carried raw; it is validated against
/// [`PrincipalKind`] when the grant is materialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grant {
    /// Principal the access was granted to
    pub principal_id: String,

    /// Resource the access was granted on
    pub resource_id: String,

    /// Raw principal kind string from the granting assignments
    pub principal_kind: String,
}
