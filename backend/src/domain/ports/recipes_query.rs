//! Driving port for recipe reads.

use async_trait::async_trait;
use pagination::PageRequest;

use crate::domain::{Error, RecipeFilter, RecipeId, RecipeView, UserId};

use super::Listing;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipesQuery: Send + Sync {
    async fn get(&self, viewer: Option<UserId>, id: RecipeId) -> Result<RecipeView, Error>;

    /// Newest-first page of recipes. Viewer-relative filters are ignored for
    /// anonymous callers.
    async fn list(
        &self,
        viewer: Option<UserId>,
        filter: RecipeFilter,
        page: PageRequest,
    ) -> Result<Listing<RecipeView>, Error>;
}
