//! Get-or-create short links with bounded hash regeneration.
//!
//! Random hashes can collide, so creation is an insert-if-absent loop: a
//! rejected insert is followed by a re-read by URL (another request may have
//! linked the same URL meanwhile) and, failing that, a fresh hash.

use std::num::NonZeroU32;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::ports::{ShortHashGenerator, ShortLinkCommand, ShortLinkRepository};
use crate::domain::{Error, OriginalUrl, ShortHash, ShortLink};

/// Default number of hashes tried before giving up.
pub const DEFAULT_SHORT_LINK_ATTEMPTS: NonZeroU32 = NonZeroU32::MIN.saturating_add(4);

/// Short-link service implementing [`ShortLinkCommand`].
#[derive(Clone)]
pub struct ShortLinkService<S, G> {
    links: Arc<S>,
    generator: Arc<G>,
    attempts: NonZeroU32,
}

impl<S, G> ShortLinkService<S, G> {
    pub fn new(links: Arc<S>, generator: Arc<G>, attempts: NonZeroU32) -> Self {
        Self {
            links,
            generator,
            attempts,
        }
    }
}

#[async_trait]
impl<S, G> ShortLinkCommand for ShortLinkService<S, G>
where
    S: ShortLinkRepository,
    G: ShortHashGenerator,
{
    async fn get_or_create(&self, url: String) -> Result<ShortLink, Error> {
        let url = OriginalUrl::new(&url).map_err(|error| Error::invalid_request(error.to_string()))?;
        if let Some(existing) = self.links.find_by_url(&url).await? {
            return Ok(existing);
        }

        for attempt in 1..=self.attempts.get() {
            let candidate = ShortLink {
                original_url: url.clone(),
                url_hash: self.generator.generate(),
            };
            if self.links.insert_if_absent(&candidate).await? {
                return Ok(candidate);
            }
            if let Some(existing) = self.links.find_by_url(&url).await? {
                return Ok(existing);
            }
            debug!(attempt, hash = %candidate.url_hash, "short link hash collided");
        }
        Err(Error::internal(format!(
            "no free short link hash after {} attempts",
            self.attempts
        )))
    }

    async fn resolve(&self, hash: String) -> Result<OriginalUrl, Error> {
        let not_found = || Error::not_found(format!("short link {hash} not found"));
        let Ok(key) = ShortHash::new(hash.clone()) else {
            return Err(not_found());
        };
        self.links
            .find_by_hash(&key)
            .await?
            .map(|link| link.original_url)
            .ok_or_else(not_found)
    }
}
