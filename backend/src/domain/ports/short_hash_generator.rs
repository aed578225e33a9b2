//! Source of candidate short-link hashes.

use crate::domain::ShortHash;

/// Produces random hash candidates. Uniqueness is not guaranteed; callers
/// rely on the store to reject collisions.
#[cfg_attr(test, mockall::automock)]
pub trait ShortHashGenerator: Send + Sync {
    fn generate(&self) -> ShortHash;
}
