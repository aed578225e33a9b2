//! Driving port for following authors.

use std::num::NonZeroU32;

use async_trait::async_trait;
use pagination::PageRequest;

use crate::domain::{AuthorCard, Error, UserId};

use super::Listing;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubscriptionsCommand: Send + Sync {
    /// Follow `author` and return their card with up to `recipes_limit`
    /// recipes.
    async fn subscribe(
        &self,
        user: UserId,
        author: UserId,
        recipes_limit: NonZeroU32,
    ) -> Result<AuthorCard, Error>;

    async fn unsubscribe(&self, user: UserId, author: UserId) -> Result<(), Error>;

    /// Authors followed by `user`.
    async fn subscriptions(
        &self,
        user: UserId,
        page: PageRequest,
        recipes_limit: NonZeroU32,
    ) -> Result<Listing<AuthorCard>, Error>;
}
