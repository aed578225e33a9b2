//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Conversions into domain types re-run the
//! domain validators so corrupt rows surface as query errors instead of
//! leaking invalid values.

use diesel::prelude::*;

use crate::domain::{
    Email, ImagePath, Ingredient, IngredientId, OriginalUrl, RecipeId, RecipeSummary, ShortHash,
    ShortLink, Tag, TagId, TagSlug, User, UserId, Username,
};

use super::schema::{
    ingredients, recipe_ingredients, recipe_tags, recipes, short_links, tags, users,
};

/// Result of converting a stored row into a domain value.
pub(crate) type RowResult<T> = Result<T, String>;

fn optional_image(raw: Option<String>) -> RowResult<Option<ImagePath>> {
    raw.filter(|path| !path.is_empty())
        .map(|path| ImagePath::new(path).map_err(|err| err.to_string()))
        .transpose()
}

fn non_negative(value: i32, column: &str) -> RowResult<u32> {
    u32::try_from(value).map_err(|_| format!("negative {column}: {value}"))
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub avatar: Option<String>,
    pub is_admin: bool,
}

impl TryFrom<UserRow> for User {
    type Error = String;

    fn try_from(row: UserRow) -> RowResult<Self> {
        Ok(Self {
            id: UserId::new(row.id),
            email: Email::new(&row.email).map_err(|err| err.to_string())?,
            username: Username::new(row.username).map_err(|err| err.to_string())?,
            first_name: row.first_name,
            last_name: row.last_name,
            avatar: optional_image(row.avatar)?,
            is_admin: row.is_admin,
        })
    }
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub email: &'a str,
    pub username: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub password_hash: &'a str,
}

// ---------------------------------------------------------------------------
// Catalogue
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tags)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TagRow {
    pub id: i64,
    pub name: String,
    pub slug: String,
}

impl TryFrom<TagRow> for Tag {
    type Error = String;

    fn try_from(row: TagRow) -> RowResult<Self> {
        Ok(Self {
            id: TagId::new(row.id),
            name: row.name,
            slug: TagSlug::new(row.slug).map_err(|err| err.to_string())?,
        })
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = ingredients)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct IngredientRow {
    pub id: i64,
    pub name: String,
    pub measurement_unit: String,
}

impl From<IngredientRow> for Ingredient {
    fn from(row: IngredientRow) -> Self {
        Self {
            id: IngredientId::new(row.id),
            name: row.name,
            measurement_unit: row.measurement_unit,
        }
    }
}

// ---------------------------------------------------------------------------
// Recipes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = recipes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct RecipeRow {
    pub id: i64,
    pub author_id: i64,
    pub name: String,
    pub image: Option<String>,
    pub text: String,
    pub cooking_time: i32,
}

impl RecipeRow {
    pub(crate) fn image(&self) -> RowResult<Option<ImagePath>> {
        optional_image(self.image.clone())
    }

    pub(crate) fn cooking_time(&self) -> RowResult<u32> {
        non_negative(self.cooking_time, "cooking_time")
    }

    pub(crate) fn summary(&self) -> RowResult<RecipeSummary> {
        Ok(RecipeSummary {
            id: RecipeId::new(self.id),
            name: self.name.clone(),
            image: self.image()?,
            cooking_time: self.cooking_time()?,
        })
    }
}

/// Insertable struct for new recipes.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = recipes)]
pub(crate) struct NewRecipeRow<'a> {
    pub author_id: i64,
    pub name: &'a str,
    pub image: Option<&'a str>,
    pub text: &'a str,
    pub cooking_time: i32,
}

/// Full overwrite of a recipe's scalar columns.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = recipes)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct RecipeChangeset<'a> {
    pub name: &'a str,
    pub image: Option<&'a str>,
    pub text: &'a str,
    pub cooking_time: i32,
}

#[derive(Debug, Clone, Copy, Insertable)]
#[diesel(table_name = recipe_tags)]
pub(crate) struct NewRecipeTagRow {
    pub recipe_id: i64,
    pub tag_id: i64,
}

#[derive(Debug, Clone, Copy, Insertable)]
#[diesel(table_name = recipe_ingredients)]
pub(crate) struct NewRecipeIngredientRow {
    pub recipe_id: i64,
    pub ingredient_id: i64,
    pub amount: i32,
}

// ---------------------------------------------------------------------------
// Short links
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = short_links)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ShortLinkRow {
    pub original_url: String,
    pub url_hash: String,
}

impl TryFrom<ShortLinkRow> for ShortLink {
    type Error = String;

    fn try_from(row: ShortLinkRow) -> RowResult<Self> {
        Ok(Self {
            original_url: OriginalUrl::new(&row.original_url).map_err(|err| err.to_string())?,
            url_hash: ShortHash::new(row.url_hash).map_err(|err| err.to_string())?,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = short_links)]
pub(crate) struct NewShortLinkRow<'a> {
    pub original_url: &'a str,
    pub url_hash: &'a str,
}
