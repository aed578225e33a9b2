//! Port for the recipe aggregate's persistence.
//!
//! Writes take a validated [`RecipeDraft`]; every write replaces the
//! recipe's tag and ingredient join rows as one unit of work. Reads return
//! viewer-relative projections so adapters can compute favourite and cart
//! flags in the same query.

use async_trait::async_trait;

use crate::domain::{
    Recipe, RecipeDraft, RecipeFilter, RecipeId, RecipeSummary, RecipeView, UserId,
};

use super::{Listing, define_port_error};

define_port_error! {
    /// Errors raised by recipe repository adapters.
    pub enum RecipeRepositoryError {
        /// Repository connection could not be established.
        Connection => "recipe repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query => "recipe repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipeRepository: Send + Sync {
    /// Insert the recipe and its join rows in one transaction.
    async fn create(
        &self,
        author: UserId,
        draft: &RecipeDraft,
    ) -> Result<RecipeId, RecipeRepositoryError>;

    /// Overwrite scalar fields and replace both join sets in one transaction.
    ///
    /// Returns `false` when the recipe no longer exists.
    async fn update(&self, id: RecipeId, draft: &RecipeDraft)
    -> Result<bool, RecipeRepositoryError>;

    /// Delete the recipe together with its join and membership rows.
    ///
    /// Returns `false` when the recipe did not exist.
    async fn delete(&self, id: RecipeId) -> Result<bool, RecipeRepositoryError>;

    async fn find(&self, id: RecipeId) -> Result<Option<Recipe>, RecipeRepositoryError>;

    async fn find_summary(
        &self,
        id: RecipeId,
    ) -> Result<Option<RecipeSummary>, RecipeRepositoryError>;

    /// Load the full projection for `viewer` (`None` for anonymous callers).
    async fn find_view(
        &self,
        id: RecipeId,
        viewer: Option<UserId>,
    ) -> Result<Option<RecipeView>, RecipeRepositoryError>;

    /// Newest-first page of recipes matching `filter`.
    async fn list(
        &self,
        filter: &RecipeFilter,
        viewer: Option<UserId>,
        offset: u64,
        limit: u32,
    ) -> Result<Listing<RecipeView>, RecipeRepositoryError>;
}
