//! Permissions Policy parsing and evaluation.
//!
//! This crate decides whether a named capability ("feature") may be exercised
//! by a given origin, based on:
//! - the page's `Permissions-Policy` HTTP header (strict structured-field
//!   dictionary syntax),
//! - an embedding iframe's `allow` attribute (lenient semicolon/whitespace
//!   syntax),
//! - a caller-supplied per-feature default allowlist.
//!
//! Parsing is origin-independent and keeps the `'self'`/`'src'`/`'none'`
//! keywords as symbolic markers; a separate normalization pass resolves them
//! against concrete origins. The evaluator intersects header and frame policy,
//! so the `allow` attribute can only narrow what the header permits.

pub mod allow_list;
pub mod attribute;
pub mod error;
pub mod header;
pub mod normalize;
pub mod origin;
pub mod policy;

pub use allow_list::{
    AllowList, AllowTarget, DefaultAllowlist, FeatureIdentifier, NormalizedPolicy, ParsedPolicy,
};
pub use attribute::parse_allow;
pub use error::{PolicyError, PolicyResult};
pub use header::parse_header;
pub use normalize::normalize;
pub use origin::Origin;
pub use policy::{FrameInfo, PermissionsPolicy, PolicySource};
