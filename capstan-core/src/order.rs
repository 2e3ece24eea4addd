//! Kind-priority apply ordering.
//!
//! Manifests are applied sequentially, so collections are sorted before
//! anything is sent anywhere: namespaces and CRDs first, RBAC primitives
//! next, workloads after, everything unlisted last. Within one kind,
//! resources order by `metadata.name`; equal keys keep their input order
//! (decode order is meaningful to callers when names collide).

use crate::resource::Resource;

/// Default apply order for well-known kinds.
///
/// Kinds absent from the list rank after every listed kind.
pub const DEFAULT_KINDS_ORDER: &[&str] = &[
    "Namespace",
    "CustomResourceDefinition",
    "Secret",
    "ConfigMap",
    "ServiceAccount",
    "ClusterRole",
    "ClusterRoleBinding",
    "Role",
    "RoleBinding",
    "Service",
    "Deployment",
    "DaemonSet",
    "StatefulSet",
    "Job",
    "CronJob",
];

/// [`DEFAULT_KINDS_ORDER`] as owned strings, for [`sort_for_apply`] and
/// options defaults.
pub fn default_kinds_order() -> Vec<String> {
    DEFAULT_KINDS_ORDER.iter().map(|k| k.to_string()).collect()
}

/// Rank of `kind` within `kinds_order`.
///
/// Returns the 0-based index, or the list length when the kind is not
/// listed — unranked kinds group together after all ranked ones.
pub fn kind_rank(kind: &str, kinds_order: &[String]) -> usize {
    kinds_order
        .iter()
        .position(|k| k == kind)
        .unwrap_or(kinds_order.len())
}

/// Stable-sort `resources` by `(rank(kind), name)` for sequential apply.
///
/// Resources with an unresolvable kind or name sort with an empty string
/// for that key component rather than failing; the orderer is total over
/// whatever generic decoding accepted.
pub fn sort_for_apply(resources: &mut [Resource], kinds_order: &[String]) {
    resources.sort_by(|a, b| {
        let rank_a = kind_rank(a.kind().unwrap_or(""), kinds_order);
        let rank_b = kind_rank(b.kind().unwrap_or(""), kinds_order);
        rank_a
            .cmp(&rank_b)
            .then_with(|| a.name().unwrap_or("").cmp(b.name().unwrap_or("")))
    });
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
