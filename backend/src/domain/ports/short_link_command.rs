//! Driving port for short redirect links.

use async_trait::async_trait;

use crate::domain::{Error, OriginalUrl, ShortLink};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ShortLinkCommand: Send + Sync {
    /// Return the link for `url`, creating one on first use.
    async fn get_or_create(&self, url: String) -> Result<ShortLink, Error>;

    /// Destination of `hash`, or `NotFound`.
    async fn resolve(&self, hash: String) -> Result<OriginalUrl, Error>;
}
