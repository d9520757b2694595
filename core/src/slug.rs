//! Deriving stable identifier tokens from display names.

use crate::entity::RelationRef;

/// Token used when there is no name to build a slug from.
pub const UNKNOWN_SLUG: &str = "unknown";

/// Turn a display name into an identifier token.
///
/// The name is lower-cased, everything but ASCII word characters, hyphens, and whitespace is
/// dropped, and runs of whitespace become a single hyphen. The same name always yields the same
/// token, so saving an unresolved relation twice converges on one identifier.
///
/// Only an absent or empty name becomes [`UNKNOWN_SLUG`]; a name made up entirely of dropped
/// characters yields an empty token.
#[must_use]
pub fn slugify(name: Option<&str>) -> String {
    let Some(name) = name.filter(|name| !name.is_empty()) else {
        return UNKNOWN_SLUG.to_string();
    };

    name.to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-' || c.is_whitespace())
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

/// The identifier to submit for a relation.
///
/// An explicit identifier wins, then the `sub` fallback, then a slug of the name.
#[must_use]
pub fn resolve_identifier(relation: &RelationRef) -> String {
    [&relation.identifier, &relation.sub]
        .into_iter()
        .flatten()
        .find(|s| !s.is_empty())
        .cloned()
        .unwrap_or_else(|| slugify(Some(relation.name.as_str())))
}
