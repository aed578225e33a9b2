//! Port for follow edges and the author cards shown to followers.

use async_trait::async_trait;

use crate::domain::{AuthorCard, Subscription, UserId};

use super::{Listing, define_port_error};

define_port_error! {
    /// Errors raised by subscription repository adapters.
    pub enum SubscriptionRepositoryError {
        /// Repository connection could not be established.
        Connection => "subscription repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query => "subscription repository query failed: {message}",
        /// The edge already exists.
        Duplicate => "subscription already exists: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    /// Insert the edge; fails with `Duplicate` when it is already present.
    async fn add(&self, edge: Subscription) -> Result<(), SubscriptionRepositoryError>;

    /// Delete the edge. Returns `false` when it did not exist.
    async fn remove(&self, edge: Subscription) -> Result<bool, SubscriptionRepositoryError>;

    /// Card for `author` as seen by `viewer`, with at most `recipes_limit`
    /// newest recipes.
    async fn author_card(
        &self,
        viewer: UserId,
        author: UserId,
        recipes_limit: u32,
    ) -> Result<Option<AuthorCard>, SubscriptionRepositoryError>;

    /// Page of authors followed by `user`, ordered by author id.
    async fn list(
        &self,
        user: UserId,
        offset: u64,
        limit: u32,
        recipes_limit: u32,
    ) -> Result<Listing<AuthorCard>, SubscriptionRepositoryError>;
}
