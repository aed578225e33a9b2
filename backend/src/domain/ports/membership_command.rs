//! Driving port for favourites and the shopping cart.

use async_trait::async_trait;

use crate::domain::{Error, MembershipKind, RecipeId, RecipeSummary, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MembershipCommand: Send + Sync {
    /// Add `recipe` to the user's collection and return its summary.
    async fn add(
        &self,
        kind: MembershipKind,
        user: UserId,
        recipe: RecipeId,
    ) -> Result<RecipeSummary, Error>;

    async fn remove(&self, kind: MembershipKind, user: UserId, recipe: RecipeId)
    -> Result<(), Error>;

    async fn contains(
        &self,
        kind: MembershipKind,
        user: UserId,
        recipe: RecipeId,
    ) -> Result<bool, Error>;
}
