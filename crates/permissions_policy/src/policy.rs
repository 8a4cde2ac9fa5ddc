//! Permissions Policy evaluation.
//!
//! [`PermissionsPolicy`] combines the page's header policy, a caller-supplied
//! default allowlist, and (for iframe views) the frame's normalized `allow`
//! attribute. Instances are immutable; deriving a frame view always produces a
//! new instance.

use std::collections::HashMap;

use crate::allow_list::{
    AllowList, DefaultAllowlist, FeatureIdentifier, NormalizedPolicy, ParsedPolicy,
};
use crate::attribute::parse_allow;
use crate::error::{PolicyError, PolicyResult};
use crate::header::parse_header;
use crate::normalize::normalize;
use crate::origin::Origin;

/// A policy value in any of its accepted input states: a raw string, a parsed
/// policy, or an already-normalized one (passed through untouched).
#[derive(Clone, Debug)]
pub enum PolicySource {
    Raw(String),
    Parsed(ParsedPolicy),
    Normalized(NormalizedPolicy),
}

impl From<&str> for PolicySource {
    fn from(value: &str) -> Self {
        Self::Raw(value.to_string())
    }
}

impl From<String> for PolicySource {
    fn from(value: String) -> Self {
        Self::Raw(value)
    }
}

impl From<ParsedPolicy> for PolicySource {
    fn from(value: ParsedPolicy) -> Self {
        Self::Parsed(value)
    }
}

impl From<NormalizedPolicy> for PolicySource {
    fn from(value: NormalizedPolicy) -> Self {
        Self::Normalized(value)
    }
}

/// Frame details for deriving an iframe policy view.
#[derive(Clone, Debug)]
pub struct FrameInfo {
    /// Value of the frame's `allow` attribute (or a pre-parsed policy).
    pub allow: PolicySource,
    /// URL origin of the iframe.
    pub origin: String,
}

impl FrameInfo {
    pub fn new(allow: impl Into<PolicySource>, origin: impl Into<String>) -> Self {
        Self {
            allow: allow.into(),
            origin: origin.into(),
        }
    }
}

#[derive(Clone, Debug)]
struct FramePolicy {
    allow: NormalizedPolicy,
    origin: Origin,
}

/// Permissions Policy for a document, optionally viewed through an embedding
/// frame.
#[derive(Clone, Debug)]
pub struct PermissionsPolicy {
    origin: Origin,
    header: NormalizedPolicy,
    defaults: HashMap<FeatureIdentifier, DefaultAllowlist>,
    frame: Option<FramePolicy>,
}

impl PermissionsPolicy {
    /// Create a top-level policy from the page origin and its
    /// `Permissions-Policy` header value (pass `""` for no header).
    ///
    /// Fails with [`PolicyError::InvalidUrl`] when the origin cannot be
    /// canonicalized, or [`PolicyError::MalformedHeader`] when a raw header
    /// string does not parse.
    pub fn new(origin: &str, header_value: impl Into<PolicySource>) -> PolicyResult<Self> {
        let origin = parse_origin(origin)?;
        let header = resolve(header_value.into(), Syntax::Header, &origin, None)?;
        Ok(Self {
            origin,
            header,
            defaults: HashMap::new(),
            frame: None,
        })
    }

    /// Attach the supported features and their default allowlists. Features
    /// absent from the map fall back to `'self'` at decision time. No feature
    /// list is maintained by this crate.
    pub fn with_default_allowlist(
        mut self,
        defaults: HashMap<FeatureIdentifier, DefaultAllowlist>,
    ) -> Self {
        self.defaults = defaults;
        self
    }

    /// Attach a frame context directly. In general prefer
    /// [`PermissionsPolicy::inherit`].
    pub fn with_frame(mut self, frame: FrameInfo) -> PolicyResult<Self> {
        let frame_origin = parse_origin(&frame.origin)?;
        let allow = resolve(
            frame.allow,
            Syntax::Attribute,
            &self.origin,
            Some(&frame_origin),
        )?;
        self.frame = Some(FramePolicy {
            allow,
            origin: frame_origin,
        });
        Ok(self)
    }

    /// Derive the policy seen by an embedded frame.
    ///
    /// The page origin, normalized header and default allowlist carry over;
    /// the frame's `allow` attribute is parsed and normalized against
    /// `(self = page origin, src = frame origin)`. The parent instance is
    /// untouched. Calling this on an already-framed instance uses that
    /// instance's fields as the baseline and replaces its frame context.
    pub fn inherit(&self, frame: FrameInfo) -> PolicyResult<Self> {
        self.clone().with_frame(frame)
    }

    /// The page's canonical origin.
    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    /// The normalized header policy.
    pub fn header(&self) -> &NormalizedPolicy {
        &self.header
    }

    /// Whether this instance is a frame view.
    pub fn is_iframe_policy(&self) -> bool {
        self.frame.is_some()
    }

    /// The frame's canonical origin, for frame views.
    pub fn frame_origin(&self) -> Option<&Origin> {
        self.frame.as_ref().map(|frame| &frame.origin)
    }

    /// Check whether `feature` is allowed when exercised by `origin`.
    ///
    /// `origin` defaults to the frame origin for a frame view, else the page
    /// origin. Never fails: an origin string that cannot be canonicalized
    /// matches nothing and yields `false`.
    ///
    /// When both the header and the frame attribute are silent on the feature,
    /// the default allowlist decides. Otherwise the result is the intersection
    /// of what the header and the frame attribute permit.
    pub fn allows_feature(&self, feature: &str, origin: Option<&str>) -> bool {
        let checked;
        let origin = match origin {
            Some(raw) => match Origin::parse(raw) {
                Some(parsed) => {
                    checked = parsed;
                    &checked
                }
                None => return false,
            },
            None => match &self.frame {
                Some(frame) => &frame.origin,
                None => &self.origin,
            },
        };

        let from_header = self.header.get(feature);
        let from_frame = self.frame.as_ref().and_then(|f| f.allow.get(feature));

        if from_header.is_none() && from_frame.is_none() {
            return self.default_allows(self.defaults.get(feature).copied(), origin);
        }
        header_allows(origin, from_header) && self.frame_allows(origin, from_frame)
    }

    fn default_allows(&self, from_default: Option<DefaultAllowlist>, origin: &Origin) -> bool {
        match from_default {
            Some(DefaultAllowlist::NoneOnly) => false,
            Some(DefaultAllowlist::Wildcard) => match &self.frame {
                // An unrestricted default does not cross into a cross-origin
                // frame that carries no explicit policy.
                Some(frame) => frame.origin.is_same_origin(&self.origin),
                None => true,
            },
            Some(DefaultAllowlist::SrcOnly) => self
                .frame
                .as_ref()
                .is_some_and(|frame| frame.origin.is_same_origin(origin)),
            // The default allowlist defaults to 'self'.
            Some(DefaultAllowlist::SelfOnly) | None => match &self.frame {
                Some(frame) => {
                    frame.origin.is_same_origin(&self.origin) && frame.origin.is_same_origin(origin)
                }
                None => self.origin.is_same_origin(origin),
            },
        }
    }

    fn frame_allows(&self, origin: &Origin, from_frame: Option<&AllowList>) -> bool {
        // No frame gate at the top level.
        let Some(frame) = &self.frame else {
            return true;
        };
        match from_frame {
            // Attribute silent: only a same-origin frame checking its own
            // origin passes.
            None => {
                frame.origin.is_same_origin(&self.origin) && frame.origin.is_same_origin(origin)
            }
            // Attribute wildcard grants only the frame's own origin,
            // asymmetric with the header's unrestricted wildcard.
            Some(AllowList::Wildcard) => origin.is_same_origin(&frame.origin),
            Some(AllowList::None) => false,
            // The frame must explicitly include itself, not merely name the
            // checked origin.
            Some(list @ AllowList::Origins(_)) => {
                list.has_origin(origin) && list.has_origin(&frame.origin)
            }
        }
    }
}

fn header_allows(origin: &Origin, from_header: Option<&AllowList>) -> bool {
    match from_header {
        // A header silent on the feature imposes no restriction.
        None => true,
        Some(list) => list.has_origin(origin),
    }
}

enum Syntax {
    Header,
    Attribute,
}

fn resolve(
    source: PolicySource,
    syntax: Syntax,
    self_origin: &Origin,
    src_origin: Option<&Origin>,
) -> PolicyResult<NormalizedPolicy> {
    let parsed = match source {
        PolicySource::Raw(raw) => match syntax {
            Syntax::Header => parse_header(&raw)?,
            Syntax::Attribute => parse_allow(&raw),
        },
        PolicySource::Parsed(parsed) => parsed,
        // Already normalized: pass through untouched.
        PolicySource::Normalized(normalized) => return Ok(normalized),
    };
    Ok(normalize(&parsed, self_origin, src_origin))
}

fn parse_origin(input: &str) -> PolicyResult<Origin> {
    Origin::parse(input).ok_or_else(|| PolicyError::InvalidUrl(input.to_string()))
}
