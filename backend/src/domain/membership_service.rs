//! Favourites and the shopping cart.
//!
//! Both collections go through one service; [`MembershipKind`] selects the
//! relation and the wording of error messages.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{
    MembershipCommand, MembershipRepository, MembershipRepositoryError, RecipeRepository,
};
use crate::domain::{Error, MembershipKind, RecipeId, RecipeSummary, UserId};

/// Membership service implementing [`MembershipCommand`].
#[derive(Clone)]
pub struct MembershipService<M, R> {
    memberships: Arc<M>,
    recipes: Arc<R>,
}

impl<M, R> MembershipService<M, R> {
    pub fn new(memberships: Arc<M>, recipes: Arc<R>) -> Self {
        Self {
            memberships,
            recipes,
        }
    }
}

impl<M, R> MembershipService<M, R>
where
    M: MembershipRepository,
    R: RecipeRepository,
{
    async fn recipe(&self, id: RecipeId) -> Result<RecipeSummary, Error> {
        self.recipes
            .find_summary(id)
            .await?
            .ok_or_else(|| Error::not_found(format!("recipe {id} not found")))
    }
}

#[async_trait]
impl<M, R> MembershipCommand for MembershipService<M, R>
where
    M: MembershipRepository,
    R: RecipeRepository,
{
    async fn add(
        &self,
        kind: MembershipKind,
        user: UserId,
        recipe: RecipeId,
    ) -> Result<RecipeSummary, Error> {
        let summary = self.recipe(recipe).await?;
        match self.memberships.add(kind, user, recipe).await {
            Ok(()) => Ok(summary),
            Err(MembershipRepositoryError::Duplicate { .. }) => {
                Err(Error::conflict(kind.already_present(&summary.name)))
            }
            Err(error) => Err(error.into()),
        }
    }

    async fn remove(
        &self,
        kind: MembershipKind,
        user: UserId,
        recipe: RecipeId,
    ) -> Result<(), Error> {
        let summary = self.recipe(recipe).await?;
        if self.memberships.remove(kind, user, recipe).await? {
            Ok(())
        } else {
            Err(Error::not_found(kind.not_present(&summary.name)))
        }
    }

    async fn contains(
        &self,
        kind: MembershipKind,
        user: UserId,
        recipe: RecipeId,
    ) -> Result<bool, Error> {
        Ok(self.memberships.contains(kind, user, recipe).await?)
    }
}
