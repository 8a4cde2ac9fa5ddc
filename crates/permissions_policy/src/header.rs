//! `Permissions-Policy` header parsing.
//!
//! The header is a structured-field dictionary (RFC 8941): comma-separated
//! `feature=value` members, where `value` is a bare item or a parenthesized
//! inner list. Dictionary parsing is delegated to the `sfv` crate; this module
//! only maps its items onto allow lists.

use std::collections::HashSet;

use sfv::{BareItem, Item, ListEntry, Parser};
use tracing::trace;

use crate::allow_list::{AllowList, AllowTarget, ParsedPolicy};
use crate::error::{PolicyError, PolicyResult};

/// Parse a `Permissions-Policy` header value.
///
/// Fails with [`PolicyError::MalformedHeader`] when the dictionary syntax is
/// invalid or a feature is declared without an allowlist (a bare key, which
/// the dictionary grammar reads as boolean true). Duplicate feature keys keep
/// the last occurrence. An empty string yields an empty policy.
pub fn parse_header(input: &str) -> PolicyResult<ParsedPolicy> {
    let dict = Parser::parse_dictionary(input.as_bytes())
        .map_err(|e| PolicyError::MalformedHeader(e.to_string()))?;

    let mut result = ParsedPolicy::new();
    for (feature, member) in dict {
        result.insert(feature, allow_list_for_member(&member)?);
    }
    Ok(result)
}

fn allow_list_for_member(member: &ListEntry) -> PolicyResult<AllowList> {
    let items: Vec<&Item> = match member {
        ListEntry::Item(item) => vec![item],
        ListEntry::InnerList(inner) => inner.items.iter().collect(),
    };

    let mut targets = HashSet::new();
    for item in items {
        let value = match &item.bare_item {
            BareItem::Token(token) => token.as_str(),
            BareItem::String(string) => string.as_str(),
            BareItem::Boolean(_) => {
                return Err(PolicyError::MalformedHeader(
                    "feature declared without an allowlist".to_string(),
                ));
            }
            other => {
                return Err(PolicyError::MalformedHeader(format!(
                    "unsupported allowlist item: {other:?}"
                )));
            }
        };

        match value {
            "*" => return Ok(AllowList::Wildcard),
            "none" => return Ok(AllowList::None),
            "self" => {
                targets.insert(AllowTarget::SelfMarker);
            }
            token => match AllowTarget::from_origin_token(token) {
                Some(target) => {
                    targets.insert(target);
                }
                None => trace!(token, "dropping allowlist target that is not a valid URL"),
            },
        }
    }

    // A member with no surviving targets (e.g. `f=()`) denies everywhere.
    if targets.is_empty() {
        Ok(AllowList::None)
    } else {
        Ok(AllowList::Origins(targets))
    }
}
