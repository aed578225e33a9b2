//! Tag slug validation.
//!
//! Slugs are non-empty identifiers composed of ASCII letters, digits,
//! hyphens and underscores, at most [`SLUG_MAX`] characters long.

/// Maximum slug length in characters.
pub const SLUG_MAX: usize = 32;

/// Return `true` when `value` is a valid tag slug.
pub(crate) fn is_valid_slug(value: &str) -> bool {
    !value.is_empty() && value.len() <= SLUG_MAX && value.chars().all(is_slug_char)
}

fn is_slug_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '-' || ch == '_'
}
