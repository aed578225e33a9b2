//! Read access to tags and ingredients.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{CatalogueQuery, CatalogueRepository};
use crate::domain::{Error, Ingredient, IngredientId, Tag, TagId};

/// Catalogue service implementing [`CatalogueQuery`].
#[derive(Clone)]
pub struct CatalogueService<C> {
    catalogue: Arc<C>,
}

impl<C> CatalogueService<C> {
    pub fn new(catalogue: Arc<C>) -> Self {
        Self { catalogue }
    }
}

#[async_trait]
impl<C> CatalogueQuery for CatalogueService<C>
where
    C: CatalogueRepository,
{
    async fn tags(&self) -> Result<Vec<Tag>, Error> {
        Ok(self.catalogue.list_tags().await?)
    }

    async fn tag(&self, id: TagId) -> Result<Tag, Error> {
        self.catalogue
            .find_tag(id)
            .await?
            .ok_or_else(|| Error::not_found(format!("tag {id} not found")))
    }

    async fn ingredients(&self, name_prefix: Option<String>) -> Result<Vec<Ingredient>, Error> {
        let name_prefix = name_prefix
            .map(|prefix| prefix.trim().to_owned())
            .filter(|prefix| !prefix.is_empty());
        Ok(self.catalogue.list_ingredients(name_prefix).await?)
    }

    async fn ingredient(&self, id: IngredientId) -> Result<Ingredient, Error> {
        self.catalogue
            .find_ingredient(id)
            .await?
            .ok_or_else(|| Error::not_found(format!("ingredient {id} not found")))
    }
}
