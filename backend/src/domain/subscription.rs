//! Directed follow edges between users.

use super::{RecipeSummary, UserCard, UserId};

/// Follow edge from `user` to `author`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subscription {
    pub user: UserId,
    pub author: UserId,
}

impl Subscription {
    /// Build an edge, rejecting self-subscription.
    pub fn new(user: UserId, author: UserId) -> Result<Self, SelfSubscription> {
        if user == author {
            return Err(SelfSubscription);
        }
        Ok(Self { user, author })
    }
}

/// A user attempted to follow themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("you cannot subscribe to yourself")]
pub struct SelfSubscription;

/// Followed author with a truncated recipe list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorCard {
    pub card: UserCard,
    /// At most `recipes_limit` of the author's newest recipes.
    pub recipes: Vec<RecipeSummary>,
    /// Total number of recipes by the author.
    pub recipes_count: u64,
}
