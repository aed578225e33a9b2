//! Batched loaders that assemble viewer-relative read models.
//!
//! Each loader issues a fixed number of queries regardless of how many rows
//! it hydrates, so list endpoints stay flat in query count.

use std::collections::{HashMap, HashSet};

use diesel::dsl::count_star;
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use crate::domain::{
    AuthorCard, Ingredient, RecipeId, RecipeIngredientView, RecipeView, Tag, User, UserCard,
    UserId,
};

use super::diesel_basic_error_mapping::ReadError;
use super::models::{IngredientRow, RecipeRow, TagRow, UserRow};
use super::schema::{
    favorite_recipes, ingredients, recipe_ingredients, recipe_tags, recipes, shopping_cart,
    subscriptions, tags, users,
};

fn invalid(message: String) -> ReadError {
    ReadError::InvalidRow(message)
}

/// Load user cards keyed by user id.
///
/// Ids with no matching row are absent from the map.
pub(crate) async fn user_cards(
    conn: &mut AsyncPgConnection,
    viewer: Option<UserId>,
    ids: &[i64],
) -> Result<HashMap<i64, UserCard>, ReadError> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows: Vec<UserRow> = users::table
        .filter(users::id.eq_any(ids))
        .select(UserRow::as_select())
        .load(conn)
        .await?;

    let followed: HashSet<i64> = match viewer {
        Some(viewer) => subscriptions::table
            .filter(subscriptions::user_id.eq(viewer.get()))
            .filter(subscriptions::author_id.eq_any(ids))
            .select(subscriptions::author_id)
            .load::<i64>(conn)
            .await?
            .into_iter()
            .collect(),
        None => HashSet::new(),
    };

    rows.into_iter()
        .map(|row| {
            let id = row.id;
            let user = User::try_from(row).map_err(invalid)?;
            let card = UserCard {
                user,
                is_subscribed: followed.contains(&id),
            };
            Ok((id, card))
        })
        .collect()
}

/// Recipe ids from `ids` that the viewer has in the given collection table.
macro_rules! viewer_collection {
    ($conn:expr, $table:ident, $viewer:expr, $ids:expr) => {
        match $viewer {
            Some(viewer) => $table::table
                .filter($table::user_id.eq(viewer.get()))
                .filter($table::recipe_id.eq_any($ids))
                .select($table::recipe_id)
                .load::<i64>($conn)
                .await?
                .into_iter()
                .collect::<HashSet<i64>>(),
            None => HashSet::new(),
        }
    };
}

/// Hydrate recipe rows into viewer-relative views, keeping row order.
pub(crate) async fn recipe_views(
    conn: &mut AsyncPgConnection,
    viewer: Option<UserId>,
    rows: Vec<RecipeRow>,
) -> Result<Vec<RecipeView>, ReadError> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }
    let recipe_ids: Vec<i64> = rows.iter().map(|row| row.id).collect();
    let mut author_ids: Vec<i64> = rows.iter().map(|row| row.author_id).collect();
    author_ids.sort_unstable();
    author_ids.dedup();

    let authors = user_cards(conn, viewer, &author_ids).await?;

    let tag_rows: Vec<(i64, TagRow)> = recipe_tags::table
        .inner_join(tags::table)
        .filter(recipe_tags::recipe_id.eq_any(&recipe_ids))
        .order(recipe_tags::id.asc())
        .select((recipe_tags::recipe_id, TagRow::as_select()))
        .load(conn)
        .await?;
    let mut tags_by_recipe: HashMap<i64, Vec<Tag>> = HashMap::new();
    for (recipe_id, row) in tag_rows {
        let tag = Tag::try_from(row).map_err(invalid)?;
        tags_by_recipe.entry(recipe_id).or_default().push(tag);
    }

    let ingredient_rows: Vec<(i64, i32, IngredientRow)> = recipe_ingredients::table
        .inner_join(ingredients::table)
        .filter(recipe_ingredients::recipe_id.eq_any(&recipe_ids))
        .order(recipe_ingredients::id.asc())
        .select((
            recipe_ingredients::recipe_id,
            recipe_ingredients::amount,
            IngredientRow::as_select(),
        ))
        .load(conn)
        .await?;
    let mut ingredients_by_recipe: HashMap<i64, Vec<RecipeIngredientView>> = HashMap::new();
    for (recipe_id, amount, row) in ingredient_rows {
        let amount =
            u32::try_from(amount).map_err(|_| invalid(format!("negative amount: {amount}")))?;
        ingredients_by_recipe
            .entry(recipe_id)
            .or_default()
            .push(RecipeIngredientView {
                ingredient: Ingredient::from(row),
                amount,
            });
    }

    let favorited = viewer_collection!(conn, favorite_recipes, viewer, &recipe_ids);
    let in_cart = viewer_collection!(conn, shopping_cart, viewer, &recipe_ids);

    rows.into_iter()
        .map(|row| {
            let author = authors
                .get(&row.author_id)
                .cloned()
                .ok_or_else(|| invalid(format!("recipe {} has no author", row.id)))?;
            Ok(RecipeView {
                id: RecipeId::new(row.id),
                author,
                image: row.image().map_err(invalid)?,
                cooking_time: row.cooking_time().map_err(invalid)?,
                tags: tags_by_recipe.remove(&row.id).unwrap_or_default(),
                ingredients: ingredients_by_recipe.remove(&row.id).unwrap_or_default(),
                is_favorited: favorited.contains(&row.id),
                is_in_shopping_cart: in_cart.contains(&row.id),
                name: row.name,
                text: row.text,
            })
        })
        .collect()
}

/// Build author cards in the order of `author_ids`, each listing at most
/// `recipes_limit` of the author's newest recipes.
pub(crate) async fn author_cards(
    conn: &mut AsyncPgConnection,
    viewer: Option<UserId>,
    author_ids: &[i64],
    recipes_limit: u32,
) -> Result<Vec<AuthorCard>, ReadError> {
    let mut cards = user_cards(conn, viewer, author_ids).await?;

    let counts: HashMap<i64, i64> = recipes::table
        .filter(recipes::author_id.eq_any(author_ids))
        .group_by(recipes::author_id)
        .select((recipes::author_id, count_star()))
        .load::<(i64, i64)>(conn)
        .await?
        .into_iter()
        .collect();

    let mut result = Vec::with_capacity(author_ids.len());
    for author_id in author_ids {
        let Some(card) = cards.remove(author_id) else {
            continue;
        };
        let rows: Vec<RecipeRow> = recipes::table
            .filter(recipes::author_id.eq(*author_id))
            .order(recipes::id.desc())
            .limit(i64::from(recipes_limit))
            .select(RecipeRow::as_select())
            .load(conn)
            .await?;
        let recipes = rows
            .iter()
            .map(RecipeRow::summary)
            .collect::<Result<Vec<_>, _>>()
            .map_err(invalid)?;
        let recipes_count = counts
            .get(author_id)
            .copied()
            .map_or(0, |count| u64::try_from(count).unwrap_or(0));
        result.push(AuthorCard {
            card,
            recipes,
            recipes_count,
        });
    }
    Ok(result)
}
