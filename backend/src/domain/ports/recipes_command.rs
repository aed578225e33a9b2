//! Driving port for recipe writes.

use async_trait::async_trait;

use crate::domain::{Error, RecipeId, RecipeInput, RecipePatch, RecipeView, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipesCommand: Send + Sync {
    /// Validate and publish a new recipe authored by `author`.
    async fn create(&self, author: UserId, input: RecipeInput) -> Result<RecipeView, Error>;

    /// Apply `patch` on behalf of `actor`, replacing both join sets.
    async fn update(
        &self,
        actor: UserId,
        id: RecipeId,
        patch: RecipePatch,
    ) -> Result<RecipeView, Error>;

    async fn delete(&self, actor: UserId, id: RecipeId) -> Result<(), Error>;
}
