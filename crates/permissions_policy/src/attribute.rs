//! Iframe `allow` attribute parsing.
//!
//! The attribute uses a lenient grammar: semicolon-separated directives, each
//! a whitespace-separated token list where the first token names the feature
//! and the rest are targets. Malformed input is tolerated by omission, never
//! an error.

use std::collections::HashSet;

use tracing::trace;

use crate::allow_list::{AllowList, AllowTarget, ParsedPolicy};

/// Parse an iframe `allow` attribute value.
///
/// A directive with no targets yields an empty origin set, which normalization
/// resolves to the frame's own origin. A `*` target wins over everything else
/// in the directive; `'none'` wins over everything but `*`. Duplicate feature
/// names keep the last directive.
pub fn parse_allow(input: &str) -> ParsedPolicy {
    let mut result = ParsedPolicy::new();

    for directive in input.split(';') {
        let mut tokens = directive.split_whitespace();
        let Some(feature) = tokens.next() else {
            // Empty directive, e.g. a trailing semicolon.
            continue;
        };
        let targets: Vec<&str> = tokens.collect();

        if targets.contains(&"*") {
            result.insert(feature, AllowList::Wildcard);
            continue;
        }
        if targets.contains(&"'none'") {
            result.insert(feature, AllowList::None);
            continue;
        }

        let mut allow_list = HashSet::new();
        for target in targets {
            match target {
                "'self'" => {
                    allow_list.insert(AllowTarget::SelfMarker);
                }
                "'src'" => {
                    allow_list.insert(AllowTarget::SrcMarker);
                }
                token => match AllowTarget::from_origin_token(token) {
                    Some(target) => {
                        allow_list.insert(target);
                    }
                    None => trace!(token, "dropping allow target that is not a valid URL"),
                },
            }
        }
        result.insert(feature, AllowList::Origins(allow_list));
    }

    result
}
