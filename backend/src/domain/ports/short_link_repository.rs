//! Port for the short-link side table.

use async_trait::async_trait;

use crate::domain::{OriginalUrl, ShortHash, ShortLink};

use super::define_port_error;

define_port_error! {
    /// Errors raised by short-link repository adapters.
    pub enum ShortLinkRepositoryError {
        /// Repository connection could not be established.
        Connection => "short link repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query => "short link repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ShortLinkRepository: Send + Sync {
    async fn find_by_url(
        &self,
        url: &OriginalUrl,
    ) -> Result<Option<ShortLink>, ShortLinkRepositoryError>;

    async fn find_by_hash(
        &self,
        hash: &ShortHash,
    ) -> Result<Option<ShortLink>, ShortLinkRepositoryError>;

    /// Insert the link unless its URL or hash is already taken.
    ///
    /// Returns `true` when the row was written. A `false` result leaves the
    /// caller to decide whether the URL was linked concurrently or the hash
    /// collided.
    async fn insert_if_absent(&self, link: &ShortLink) -> Result<bool, ShortLinkRepositoryError>;
}
