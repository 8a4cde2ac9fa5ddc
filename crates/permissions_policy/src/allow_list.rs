//! Allow-list data model shared by both policy syntaxes.

use std::collections::HashSet;

use indexmap::IndexMap;

use crate::origin::Origin;

/// Opaque token naming a gated capability (e.g. "fullscreen").
///
/// No list of supported features is maintained here; callers decide which
/// identifiers are meaningful via the default allowlist.
pub type FeatureIdentifier = String;

/// Element of a per-feature origin set.
///
/// The keyword markers only occur before normalization; `normalize` resolves
/// them against concrete origins.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum AllowTarget {
    /// `'self'` keyword, resolved to the page origin.
    SelfMarker,
    /// `'src'` keyword, resolved to the frame origin.
    SrcMarker,
    /// `'none'` keyword, collapses the entry to deny-all.
    NoneMarker,
    /// A concrete canonical origin serialization (`scheme://host[:port]`).
    Origin(String),
}

impl AllowTarget {
    /// Canonicalize a raw target token into an origin target, if it parses as
    /// a URL with a host-based origin.
    pub fn from_origin_token(token: &str) -> Option<Self> {
        Origin::parse(token).map(|origin| AllowTarget::Origin(origin.serialize()))
    }
}

/// Per-feature rule: allow everywhere, allow nowhere, or an explicit origin set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AllowList {
    /// `*` — the feature is allowed for every origin.
    Wildcard,
    /// `none` — the feature is allowed for no origin.
    None,
    /// An explicit set of targets. Empty is meaningful (present-but-empty is
    /// distinct from absent) and never folded into `None` by normalization.
    Origins(HashSet<AllowTarget>),
}

impl AllowList {
    /// Membership test for a canonical origin. `Wildcard` and `None` are
    /// terminal and never consult the set.
    pub fn has_origin(&self, origin: &Origin) -> bool {
        match self {
            AllowList::Wildcard => true,
            AllowList::None => false,
            AllowList::Origins(set) => set.contains(&AllowTarget::Origin(origin.serialize())),
        }
    }
}

/// One of `*`, `'self'`, `'none'`, `'src'`: the fallback rule used when
/// neither the header nor the `allow` attribute mention a feature.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DefaultAllowlist {
    /// Allowed everywhere (gated to same-origin frames in iframe context).
    Wildcard,
    /// Allowed only for the page's own origin.
    SelfOnly,
    /// Allowed nowhere.
    NoneOnly,
    /// Allowed only for the frame's own origin.
    SrcOnly,
}

/// Feature → allow-list mapping fresh out of a parser.
///
/// Origin sets may still contain symbolic markers; run [`crate::normalize`]
/// to resolve them. Insertion order is preserved; inserting an existing key
/// overwrites its value (last occurrence wins).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParsedPolicy {
    entries: IndexMap<FeatureIdentifier, AllowList>,
}

impl ParsedPolicy {
    /// Create an empty policy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an allow list for a feature, replacing any previous one.
    pub fn insert(&mut self, feature: impl Into<FeatureIdentifier>, list: AllowList) {
        self.entries.insert(feature.into(), list);
    }

    /// Get the allow list for a feature, if the policy mentions it.
    pub fn get(&self, feature: &str) -> Option<&AllowList> {
        self.entries.get(feature)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&FeatureIdentifier, &AllowList)> {
        self.entries.iter()
    }
}

/// A policy whose origin sets contain only concrete origins.
///
/// Produced by [`crate::normalize`]; a distinct type from [`ParsedPolicy`] so
/// that "already normalized" is a property of the type, not of object identity.
/// There is deliberately no conversion back to [`ParsedPolicy`]: a normalized
/// value must not re-enter normalization, where the empty-set src default
/// would reopen a collapsed `'none'` entry. Already-normalized inputs pass
/// through [`crate::PolicySource::Normalized`] untouched instead.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NormalizedPolicy {
    entries: IndexMap<FeatureIdentifier, AllowList>,
}

impl NormalizedPolicy {
    pub(crate) fn from_entries(entries: IndexMap<FeatureIdentifier, AllowList>) -> Self {
        Self { entries }
    }

    /// Get the allow list for a feature, if the policy mentions it.
    pub fn get(&self, feature: &str) -> Option<&AllowList> {
        self.entries.get(feature)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&FeatureIdentifier, &AllowList)> {
        self.entries.iter()
    }
}
