//! Cache-control policy for per-user responses.

/// Per-user bodies (own profile, shopping list) must not be served from a
/// shared cache and must be revalidated before reuse.
pub const PRIVATE_NO_CACHE: &str = "private, no-cache, must-revalidate";

/// Header tuple for [`PRIVATE_NO_CACHE`].
pub const fn private_no_cache_header() -> (&'static str, &'static str) {
    ("Cache-Control", PRIVATE_NO_CACHE)
}
