//! Read-side port for tags and ingredients.
//!
//! Tags and ingredients are admin-managed reference data. The application
//! only reads them, either for the public catalogue endpoints or to check
//! that recipe writes reference rows that exist.

use async_trait::async_trait;

use crate::domain::{Ingredient, IngredientId, Tag, TagId};

use super::define_port_error;

define_port_error! {
    /// Errors raised when reading catalogue data.
    pub enum CatalogueRepositoryError {
        /// Repository connection could not be established.
        Connection => "catalogue connection failed: {message}",
        /// Query failed during execution or row conversion.
        Query => "catalogue query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogueRepository: Send + Sync {
    /// All tags ordered by name.
    async fn list_tags(&self) -> Result<Vec<Tag>, CatalogueRepositoryError>;

    async fn find_tag(&self, id: TagId) -> Result<Option<Tag>, CatalogueRepositoryError>;

    /// Ingredients ordered by name, optionally restricted to names starting
    /// with `name_prefix` (case-sensitive).
    async fn list_ingredients(
        &self,
        name_prefix: Option<String>,
    ) -> Result<Vec<Ingredient>, CatalogueRepositoryError>;

    async fn find_ingredient(
        &self,
        id: IngredientId,
    ) -> Result<Option<Ingredient>, CatalogueRepositoryError>;

    /// Ids from `ids` with no matching tag, in ascending order.
    async fn missing_tag_ids(&self, ids: &[TagId]) -> Result<Vec<TagId>, CatalogueRepositoryError>;

    /// Ids from `ids` with no matching ingredient, in ascending order.
    async fn missing_ingredient_ids(
        &self,
        ids: &[IngredientId],
    ) -> Result<Vec<IngredientId>, CatalogueRepositoryError>;
}
