//! Following authors.

use std::num::NonZeroU32;
use std::sync::Arc;

use async_trait::async_trait;
use pagination::PageRequest;
use serde_json::json;

use crate::domain::ports::{
    Listing, SubscriptionRepository, SubscriptionRepositoryError, SubscriptionsCommand,
    UserRepository,
};
use crate::domain::{AuthorCard, Error, Subscription, User, UserId};

/// Subscription service implementing [`SubscriptionsCommand`].
#[derive(Clone)]
pub struct SubscriptionService<S, U> {
    subscriptions: Arc<S>,
    users: Arc<U>,
}

impl<S, U> SubscriptionService<S, U> {
    pub fn new(subscriptions: Arc<S>, users: Arc<U>) -> Self {
        Self {
            subscriptions,
            users,
        }
    }
}

fn edge(user: UserId, author: UserId) -> Result<Subscription, Error> {
    Subscription::new(user, author).map_err(|error| {
        Error::invalid_request(error.to_string())
            .with_details(json!({ "field": "author", "code": "self_subscription" }))
    })
}

impl<S, U> SubscriptionService<S, U>
where
    S: SubscriptionRepository,
    U: UserRepository,
{
    async fn author(&self, id: UserId) -> Result<User, Error> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found(format!("user {id} not found")))
    }
}

#[async_trait]
impl<S, U> SubscriptionsCommand for SubscriptionService<S, U>
where
    S: SubscriptionRepository,
    U: UserRepository,
{
    async fn subscribe(
        &self,
        user: UserId,
        author: UserId,
        recipes_limit: NonZeroU32,
    ) -> Result<AuthorCard, Error> {
        let edge = edge(user, author)?;
        let followed = self.author(author).await?;
        match self.subscriptions.add(edge).await {
            Ok(()) => {}
            Err(SubscriptionRepositoryError::Duplicate { .. }) => {
                return Err(Error::conflict(format!(
                    "You are already subscribed to {}.",
                    followed.username
                )));
            }
            Err(error) => return Err(error.into()),
        }
        self.subscriptions
            .author_card(user, author, recipes_limit.get())
            .await?
            .ok_or_else(|| Error::internal(format!("author {author} vanished after subscribe")))
    }

    async fn unsubscribe(&self, user: UserId, author: UserId) -> Result<(), Error> {
        let edge = edge(user, author)?;
        let followed = self.author(author).await?;
        if self.subscriptions.remove(edge).await? {
            Ok(())
        } else {
            Err(Error::not_found(format!(
                "You are not subscribed to {}.",
                followed.username
            )))
        }
    }

    async fn subscriptions(
        &self,
        user: UserId,
        page: PageRequest,
        recipes_limit: NonZeroU32,
    ) -> Result<Listing<AuthorCard>, Error> {
        let listing = self
            .subscriptions
            .list(user, page.offset(), page.limit(), recipes_limit.get())
            .await?;
        page.ensure_within(listing.total)
            .map_err(|error| Error::not_found(error.to_string()))?;
        Ok(listing)
    }
}
