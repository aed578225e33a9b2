//! Recipe writes and reads.
//!
//! Writes run in a fixed order: composition checks, one batched existence
//! check per referenced kind, image storage, then a single repository call
//! that persists the recipe together with its join rows. Nothing is written
//! until every check has passed.

use std::sync::Arc;

use async_trait::async_trait;
use pagination::PageRequest;
use serde_json::json;
use tracing::warn;

use crate::domain::ports::{
    CatalogueRepository, ImageStore, Listing, RecipeRepository, RecipesCommand, RecipesQuery,
    UserRepository,
};
use crate::domain::{
    Error, ImageFolder, ImagePath, Recipe, RecipeDraft, RecipeFilter, RecipeId, RecipeInput,
    RecipeLimits, RecipePatch, RecipeValidationError, RecipeView, UserId,
};

/// Recipe service implementing [`RecipesCommand`] and [`RecipesQuery`].
#[derive(Clone)]
pub struct RecipeService<R, C, U, I> {
    recipes: Arc<R>,
    catalogue: Arc<C>,
    users: Arc<U>,
    images: Arc<I>,
    limits: RecipeLimits,
}

impl<R, C, U, I> RecipeService<R, C, U, I> {
    pub fn new(
        recipes: Arc<R>,
        catalogue: Arc<C>,
        users: Arc<U>,
        images: Arc<I>,
        limits: RecipeLimits,
    ) -> Self {
        Self {
            recipes,
            catalogue,
            users,
            images,
            limits,
        }
    }
}

fn recipe_not_found(id: RecipeId) -> Error {
    Error::not_found(format!("recipe {id} not found"))
}

impl<R, C, U, I> RecipeService<R, C, U, I>
where
    R: RecipeRepository,
    C: CatalogueRepository,
    U: UserRepository,
    I: ImageStore,
{
    /// Validate, resolve references, and store any inline image.
    ///
    /// `current` is the image the recipe already has; it is the only stored
    /// reference a client may submit. Returns the draft and the path of a
    /// newly stored image, if any.
    async fn prepare(
        &self,
        input: RecipeInput,
        current: Option<&ImagePath>,
    ) -> Result<(RecipeDraft, Option<ImagePath>), Error> {
        let (draft, pending) = RecipeDraft::validate(input, &self.limits)?;
        if draft.image().is_some() && draft.image() != current {
            return Err(Error::invalid_request(
                "image must be uploaded as a base64 data URI",
            )
            .with_details(json!({ "field": "image", "code": "unknown_reference" })));
        }

        let missing_tags = self.catalogue.missing_tag_ids(draft.tags()).await?;
        if !missing_tags.is_empty() {
            return Err(RecipeValidationError::MissingTags(missing_tags).into());
        }
        let missing_ingredients = self
            .catalogue
            .missing_ingredient_ids(&draft.ingredient_ids())
            .await?;
        if !missing_ingredients.is_empty() {
            return Err(RecipeValidationError::MissingIngredients(missing_ingredients).into());
        }

        match pending {
            Some(image) => {
                let path = self.images.store(ImageFolder::Recipes, &image).await?;
                Ok((draft.with_image(path.clone()), Some(path)))
            }
            None => Ok((draft, None)),
        }
    }

    async fn find_modifiable(&self, actor: UserId, id: RecipeId) -> Result<Recipe, Error> {
        let recipe = self
            .recipes
            .find(id)
            .await?
            .ok_or_else(|| recipe_not_found(id))?;
        let actor = self
            .users
            .find_by_id(actor)
            .await?
            .ok_or_else(|| Error::unauthorized("login required"))?;
        recipe.ensure_modifiable_by(&actor)?;
        Ok(recipe)
    }

    async fn load_view(&self, viewer: UserId, id: RecipeId) -> Result<RecipeView, Error> {
        self.recipes
            .find_view(id, Some(viewer))
            .await?
            .ok_or_else(|| Error::internal(format!("recipe {id} vanished after write")))
    }

    /// Remove a stored image that is no longer referenced.
    async fn discard_image(&self, image: Option<&ImagePath>) {
        let Some(image) = image else {
            return;
        };
        if let Err(error) = self.images.remove(image).await {
            warn!(%error, image = %image, "failed to remove unreferenced image");
        }
    }
}

#[async_trait]
impl<R, C, U, I> RecipesCommand for RecipeService<R, C, U, I>
where
    R: RecipeRepository,
    C: CatalogueRepository,
    U: UserRepository,
    I: ImageStore,
{
    async fn create(&self, author: UserId, input: RecipeInput) -> Result<RecipeView, Error> {
        let (draft, stored) = self.prepare(input, None).await?;
        let id = match self.recipes.create(author, &draft).await {
            Ok(id) => id,
            Err(error) => {
                self.discard_image(stored.as_ref()).await;
                return Err(error.into());
            }
        };
        self.load_view(author, id).await
    }

    async fn update(
        &self,
        actor: UserId,
        id: RecipeId,
        patch: RecipePatch,
    ) -> Result<RecipeView, Error> {
        let existing = self.find_modifiable(actor, id).await?;
        let input = patch.apply_to(&existing)?;
        let (draft, stored) = self.prepare(input, existing.image.as_ref()).await?;

        let updated = match self.recipes.update(id, &draft).await {
            Ok(updated) => updated,
            Err(error) => {
                self.discard_image(stored.as_ref()).await;
                return Err(error.into());
            }
        };
        if !updated {
            self.discard_image(stored.as_ref()).await;
            return Err(recipe_not_found(id));
        }
        if existing.image.as_ref() != draft.image() {
            self.discard_image(existing.image.as_ref()).await;
        }
        self.load_view(actor, id).await
    }

    async fn delete(&self, actor: UserId, id: RecipeId) -> Result<(), Error> {
        let existing = self.find_modifiable(actor, id).await?;
        if !self.recipes.delete(id).await? {
            return Err(recipe_not_found(id));
        }
        self.discard_image(existing.image.as_ref()).await;
        Ok(())
    }
}

#[async_trait]
impl<R, C, U, I> RecipesQuery for RecipeService<R, C, U, I>
where
    R: RecipeRepository,
    C: CatalogueRepository,
    U: UserRepository,
    I: ImageStore,
{
    async fn get(&self, viewer: Option<UserId>, id: RecipeId) -> Result<RecipeView, Error> {
        self.recipes
            .find_view(id, viewer)
            .await?
            .ok_or_else(|| recipe_not_found(id))
    }

    async fn list(
        &self,
        viewer: Option<UserId>,
        filter: RecipeFilter,
        page: PageRequest,
    ) -> Result<Listing<RecipeView>, Error> {
        let filter = filter.for_viewer(viewer);
        let listing = self
            .recipes
            .list(&filter, viewer, page.offset(), page.limit())
            .await?;
        page.ensure_within(listing.total)
            .map_err(|error| Error::not_found(error.to_string()))?;
        Ok(listing)
    }
}

#[cfg(test)]
#[path = "recipe_service_tests.rs"]
mod tests;
