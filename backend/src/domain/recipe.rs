//! Recipe aggregate: composition rules and read models.
//!
//! A recipe owns its tag set and its ingredient portions. Writes go through
//! [`RecipeDraft::validate`], which enforces the composition invariants that
//! do not need storage access (non-empty, duplicate-free, thresholds). The
//! existence of referenced tags and ingredients is checked by
//! [`RecipeService`](crate::domain::RecipeService) in one batch per kind.

use std::collections::BTreeSet;
use std::fmt::Display;

use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{
    Error, ImageInput, ImagePath, Ingredient, IngredientId, InlineImage, RecipeId, Tag, TagId,
    TagSlug, User, UserCard, UserId,
};

/// Maximum recipe name length.
pub const RECIPE_NAME_MAX: usize = 256;
/// Largest value accepted for integer columns.
const STORAGE_INT_MAX: i64 = i32::MAX as i64;

/// Configured lower bounds for recipe values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecipeLimits {
    pub min_cooking_time: u32,
    pub min_amount: u32,
}

impl Default for RecipeLimits {
    fn default() -> Self {
        Self {
            min_cooking_time: 1,
            min_amount: 1,
        }
    }
}

/// Composition failures. All of them surface as validation errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecipeValidationError {
    #[error("name must not be empty")]
    EmptyName,
    #[error("name must be at most {RECIPE_NAME_MAX} characters")]
    NameTooLong,
    #[error("text must not be empty")]
    EmptyText,
    #[error("cooking_time must be at least {min}")]
    CookingTimeTooShort { min: u32 },
    #[error("{field} is too large")]
    ValueTooLarge { field: &'static str },
    #[error("tags must not be empty")]
    EmptyTags,
    #[error("tags must be unique, repeated ids: {}", join_ids(.0))]
    DuplicateTags(Vec<TagId>),
    #[error("tags with ids {} do not exist", join_ids(.0))]
    MissingTags(Vec<TagId>),
    #[error("ingredients must not be empty")]
    EmptyIngredients,
    #[error("ingredients must be unique, repeated ids: {}", join_ids(.0))]
    DuplicateIngredients(Vec<IngredientId>),
    #[error("ingredients with ids {} do not exist", join_ids(.0))]
    MissingIngredients(Vec<IngredientId>),
    #[error("amount for ingredient {ingredient_id} must be at least {min}")]
    AmountTooSmall { ingredient_id: IngredientId, min: u32 },
    #[error("{0} is required")]
    MissingField(&'static str),
}

fn join_ids<T: Display>(ids: &[T]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl RecipeValidationError {
    /// Request field the error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyName | Self::NameTooLong => "name",
            Self::EmptyText => "text",
            Self::CookingTimeTooShort { .. } => "cooking_time",
            Self::ValueTooLarge { field } | Self::MissingField(field) => field,
            Self::EmptyTags | Self::DuplicateTags(_) | Self::MissingTags(_) => "tags",
            Self::EmptyIngredients
            | Self::DuplicateIngredients(_)
            | Self::MissingIngredients(_)
            | Self::AmountTooSmall { .. } => "ingredients",
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::EmptyName | Self::EmptyText | Self::EmptyTags | Self::EmptyIngredients => "empty",
            Self::NameTooLong | Self::ValueTooLarge { .. } => "too_large",
            Self::CookingTimeTooShort { .. } | Self::AmountTooSmall { .. } => "below_minimum",
            Self::DuplicateTags(_) | Self::DuplicateIngredients(_) => "duplicate_ids",
            Self::MissingTags(_) | Self::MissingIngredients(_) => "unknown_ids",
            Self::MissingField(_) => "missing_field",
        }
    }

    fn ids(&self) -> Option<Vec<i64>> {
        match self {
            Self::DuplicateTags(ids) | Self::MissingTags(ids) => {
                Some(ids.iter().map(|id| id.get()).collect())
            }
            Self::DuplicateIngredients(ids) | Self::MissingIngredients(ids) => {
                Some(ids.iter().map(|id| id.get()).collect())
            }
            Self::AmountTooSmall { ingredient_id, .. } => Some(vec![ingredient_id.get()]),
            _ => None,
        }
    }
}

impl From<RecipeValidationError> for Error {
    fn from(value: RecipeValidationError) -> Self {
        let mut details = json!({ "field": value.field(), "code": value.code() });
        if let (Some(ids), Some(map)) = (value.ids(), details.as_object_mut()) {
            map.insert("ids".to_owned(), json!(ids));
        }
        Self::invalid_request(value.to_string()).with_details(details)
    }
}

/// Ingredient reference with a quantity, as submitted by a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortionInput {
    pub ingredient_id: IngredientId,
    pub amount: i64,
}

/// Validated ingredient reference with a quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientPortion {
    pub ingredient_id: IngredientId,
    pub amount: u32,
}

/// Unvalidated recipe fields for create and full replacement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeInput {
    pub name: String,
    pub text: String,
    pub cooking_time: i64,
    pub image: Option<ImageInput>,
    pub tags: Vec<TagId>,
    pub ingredients: Vec<PortionInput>,
}

/// Partial edit. `tags` and `ingredients` must always be present because
/// an edit replaces both sets entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipePatch {
    pub name: Option<String>,
    pub text: Option<String>,
    pub cooking_time: Option<i64>,
    pub image: Option<ImageInput>,
    pub tags: Option<Vec<TagId>>,
    pub ingredients: Option<Vec<PortionInput>>,
}

impl RecipePatch {
    /// Overlay the patch on the stored recipe.
    ///
    /// # Examples
    /// ```
    /// use foodgram::domain::{RecipePatch, RecipeValidationError};
    /// # use foodgram::domain::{Recipe, RecipeId, UserId};
    /// # let recipe = Recipe {
    /// #     id: RecipeId::new(1), author_id: UserId::new(1), name: "Soup".into(),
    /// #     image: None, text: "Boil".into(), cooking_time: 10, tags: vec![], ingredients: vec![],
    /// # };
    ///
    /// let err = RecipePatch::default().apply_to(&recipe).expect_err("tags required");
    /// assert_eq!(err, RecipeValidationError::MissingField("tags"));
    /// ```
    pub fn apply_to(self, existing: &Recipe) -> Result<RecipeInput, RecipeValidationError> {
        let tags = self.tags.ok_or(RecipeValidationError::MissingField("tags"))?;
        let ingredients = self
            .ingredients
            .ok_or(RecipeValidationError::MissingField("ingredients"))?;
        Ok(RecipeInput {
            name: self.name.unwrap_or_else(|| existing.name.clone()),
            text: self.text.unwrap_or_else(|| existing.text.clone()),
            cooking_time: self
                .cooking_time
                .unwrap_or_else(|| i64::from(existing.cooking_time)),
            image: self
                .image
                .or_else(|| existing.image.clone().map(ImageInput::Stored)),
            tags,
            ingredients,
        })
    }
}

/// Recipe fields that passed composition checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeDraft {
    name: String,
    text: String,
    cooking_time: u32,
    image: Option<ImagePath>,
    tags: Vec<TagId>,
    ingredients: Vec<IngredientPortion>,
}

fn bounded(
    value: i64,
    min: u32,
    field: &'static str,
    too_small: RecipeValidationError,
) -> Result<u32, RecipeValidationError> {
    if value < i64::from(min) {
        return Err(too_small);
    }
    if value > STORAGE_INT_MAX {
        return Err(RecipeValidationError::ValueTooLarge { field });
    }
    u32::try_from(value).map_err(|_| RecipeValidationError::ValueTooLarge { field })
}

fn repeated<T: Ord + Copy>(ids: impl IntoIterator<Item = T>) -> Vec<T> {
    let mut seen = BTreeSet::new();
    let mut repeated = BTreeSet::new();
    for id in ids {
        if !seen.insert(id) {
            repeated.insert(id);
        }
    }
    repeated.into_iter().collect()
}

impl RecipeDraft {
    /// Check composition rules.
    ///
    /// Returns the draft and, for inline images, the decoded payload that
    /// still has to be stored and attached with [`RecipeDraft::with_image`].
    pub fn validate(
        input: RecipeInput,
        limits: &RecipeLimits,
    ) -> Result<(Self, Option<InlineImage>), RecipeValidationError> {
        let name = input.name.trim().to_owned();
        if name.is_empty() {
            return Err(RecipeValidationError::EmptyName);
        }
        if name.chars().count() > RECIPE_NAME_MAX {
            return Err(RecipeValidationError::NameTooLong);
        }
        if input.text.trim().is_empty() {
            return Err(RecipeValidationError::EmptyText);
        }
        let cooking_time = bounded(
            input.cooking_time,
            limits.min_cooking_time,
            "cooking_time",
            RecipeValidationError::CookingTimeTooShort {
                min: limits.min_cooking_time,
            },
        )?;

        if input.tags.is_empty() {
            return Err(RecipeValidationError::EmptyTags);
        }
        let duplicate_tags = repeated(input.tags.iter().copied());
        if !duplicate_tags.is_empty() {
            return Err(RecipeValidationError::DuplicateTags(duplicate_tags));
        }

        if input.ingredients.is_empty() {
            return Err(RecipeValidationError::EmptyIngredients);
        }
        let duplicate_ingredients = repeated(input.ingredients.iter().map(|p| p.ingredient_id));
        if !duplicate_ingredients.is_empty() {
            return Err(RecipeValidationError::DuplicateIngredients(
                duplicate_ingredients,
            ));
        }
        let ingredients = input
            .ingredients
            .iter()
            .map(|portion| {
                let too_small = RecipeValidationError::AmountTooSmall {
                    ingredient_id: portion.ingredient_id,
                    min: limits.min_amount,
                };
                bounded(portion.amount, limits.min_amount, "amount", too_small).map(|amount| {
                    IngredientPortion {
                        ingredient_id: portion.ingredient_id,
                        amount,
                    }
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let (image, pending) = match input.image {
            None => (None, None),
            Some(ImageInput::Stored(path)) => (Some(path), None),
            Some(ImageInput::Inline(inline)) => (None, Some(inline)),
        };

        Ok((
            Self {
                name,
                text: input.text,
                cooking_time,
                image,
                tags: input.tags,
                ingredients,
            },
            pending,
        ))
    }

    /// Attach a stored image.
    #[must_use]
    pub fn with_image(mut self, image: ImagePath) -> Self {
        self.image = Some(image);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cooking_time(&self) -> u32 {
        self.cooking_time
    }

    pub fn image(&self) -> Option<&ImagePath> {
        self.image.as_ref()
    }

    pub fn tags(&self) -> &[TagId] {
        &self.tags
    }

    pub fn ingredients(&self) -> &[IngredientPortion] {
        &self.ingredients
    }

    /// Referenced ingredient ids in submission order.
    pub fn ingredient_ids(&self) -> Vec<IngredientId> {
        self.ingredients.iter().map(|p| p.ingredient_id).collect()
    }
}

/// Stored recipe with its join rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
    pub id: RecipeId,
    pub author_id: UserId,
    pub name: String,
    pub image: Option<ImagePath>,
    pub text: String,
    pub cooking_time: u32,
    pub tags: Vec<TagId>,
    pub ingredients: Vec<IngredientPortion>,
}

impl Recipe {
    /// Authors and admins may edit or delete a recipe.
    pub fn ensure_modifiable_by(&self, actor: &User) -> Result<(), Error> {
        if actor.is_admin || actor.id == self.author_id {
            Ok(())
        } else {
            Err(Error::forbidden(
                "only the author or an administrator may change this recipe",
            ))
        }
    }
}

/// Compact recipe representation used by collections and author cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeSummary {
    pub id: RecipeId,
    pub name: String,
    pub image: Option<ImagePath>,
    pub cooking_time: u32,
}

/// Ingredient line inside a recipe view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeIngredientView {
    pub ingredient: Ingredient,
    pub amount: u32,
}

/// Recipe as seen by a particular viewer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeView {
    pub id: RecipeId,
    pub author: UserCard,
    pub name: String,
    pub image: Option<ImagePath>,
    pub text: String,
    pub cooking_time: u32,
    pub tags: Vec<Tag>,
    pub ingredients: Vec<RecipeIngredientView>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
}

/// Recipe listing filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeFilter {
    /// Recipes carrying any of these tags.
    pub tags: Vec<TagSlug>,
    pub author: Option<UserId>,
    pub is_favorited: Option<bool>,
    pub is_in_shopping_cart: Option<bool>,
}

impl RecipeFilter {
    /// Drop viewer-relative flags for anonymous callers.
    #[must_use]
    pub fn for_viewer(mut self, viewer: Option<UserId>) -> Self {
        if viewer.is_none() {
            self.is_favorited = None;
            self.is_in_shopping_cart = None;
        }
        self
    }
}
