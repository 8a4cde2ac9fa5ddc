//! Origin-aware resolution of keyword markers.
//!
//! Parsing is origin-independent; this pass resolves `'self'`/`'src'`/`'none'`
//! markers against concrete origins, producing a [`NormalizedPolicy`]. It is a
//! pure transformation: the input map and its sets are never mutated or
//! aliased.

use std::collections::HashSet;

use indexmap::IndexMap;

use crate::allow_list::{AllowList, AllowTarget, NormalizedPolicy, ParsedPolicy};
use crate::origin::Origin;

/// Resolve keyword markers in `parsed` against the page origin and, in iframe
/// context, the frame origin.
///
/// - An empty origin set with `src_origin` present resolves to the frame's own
///   origin: an attribute directive with no targets grants the frame, not the
///   embedding page.
/// - A set containing `'none'` collapses to the empty set (deny-all), unifying
///   the two syntaxes' deny representations.
/// - `'self'` becomes `self_origin`; `'src'` becomes `src_origin` when one is
///   supplied and is kept unresolved otherwise.
///
/// Idempotent: input without markers maps to an equal value.
pub fn normalize(
    parsed: &ParsedPolicy,
    self_origin: &Origin,
    src_origin: Option<&Origin>,
) -> NormalizedPolicy {
    let mut entries = IndexMap::with_capacity(parsed.len());

    for (feature, list) in parsed.iter() {
        let value = match list {
            AllowList::Wildcard => AllowList::Wildcard,
            AllowList::None => AllowList::None,
            AllowList::Origins(set) => AllowList::Origins(resolve_set(set, self_origin, src_origin)),
        };
        entries.insert(feature.clone(), value);
    }

    NormalizedPolicy::from_entries(entries)
}

fn resolve_set(
    set: &HashSet<AllowTarget>,
    self_origin: &Origin,
    src_origin: Option<&Origin>,
) -> HashSet<AllowTarget> {
    if set.is_empty() {
        return match src_origin {
            Some(src) => HashSet::from([AllowTarget::Origin(src.serialize())]),
            None => HashSet::new(),
        };
    }

    if set.contains(&AllowTarget::NoneMarker) {
        // Deny-all, regardless of what else the set names.
        return HashSet::new();
    }

    let mut resolved = HashSet::with_capacity(set.len());
    for target in set {
        match target {
            AllowTarget::SelfMarker => {
                resolved.insert(AllowTarget::Origin(self_origin.serialize()));
            }
            AllowTarget::SrcMarker => match src_origin {
                Some(src) => {
                    resolved.insert(AllowTarget::Origin(src.serialize()));
                }
                // Without a frame context 'src' has nothing to resolve to;
                // the marker stays and matches no origin.
                None => {
                    resolved.insert(AllowTarget::SrcMarker);
                }
            },
            AllowTarget::NoneMarker => unreachable!("handled above"),
            AllowTarget::Origin(origin) => {
                resolved.insert(AllowTarget::Origin(origin.clone()));
            }
        }
    }
    resolved
}
