//! PostgreSQL-backed `RecipeRepository` implementation using Diesel ORM.
//!
//! Writes touch the recipe row and both join tables, so every mutation runs
//! inside one transaction. Reads that hydrate views also use a transaction
//! so all their SELECTs observe the same snapshot.

use async_trait::async_trait;
use diesel::dsl::count_star;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, AsyncPgConnection, RunQueryDsl};

use crate::domain::ports::{Listing, RecipeRepository, RecipeRepositoryError};
use crate::domain::{
    IngredientId, IngredientPortion, Recipe, RecipeDraft, RecipeFilter, RecipeId, RecipeSummary,
    RecipeView, TagId, UserId,
};

use super::diesel_basic_error_mapping::{ReadError, repository_error_mappers};
use super::models::{
    NewRecipeIngredientRow, NewRecipeRow, NewRecipeTagRow, RecipeChangeset, RecipeRow,
};
use super::pool::DbPool;
use super::read_models;
use super::schema::{
    favorite_recipes, recipe_ingredients, recipe_tags, recipes, shopping_cart, tags,
};

/// Diesel-backed recipe aggregate storage.
#[derive(Clone)]
pub struct DieselRecipeRepository {
    pool: DbPool,
}

impl DieselRecipeRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

repository_error_mappers!(RecipeRepositoryError);

fn storage_int(value: u32, field: &str) -> Result<i32, RecipeRepositoryError> {
    i32::try_from(value).map_err(|_| RecipeRepositoryError::query(format!("{field} out of range")))
}

/// Scalar columns of a draft, checked against the storage integer range.
struct DraftColumns<'a> {
    draft: &'a RecipeDraft,
    cooking_time: i32,
    amounts: Vec<(i64, i32)>,
}

impl<'a> DraftColumns<'a> {
    fn new(draft: &'a RecipeDraft) -> Result<Self, RecipeRepositoryError> {
        let amounts = draft
            .ingredients()
            .iter()
            .map(|portion| {
                storage_int(portion.amount, "amount")
                    .map(|amount| (portion.ingredient_id.get(), amount))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            draft,
            cooking_time: storage_int(draft.cooking_time(), "cooking_time")?,
            amounts,
        })
    }

    fn tag_rows(&self, recipe_id: i64) -> Vec<NewRecipeTagRow> {
        self.draft
            .tags()
            .iter()
            .map(|tag| NewRecipeTagRow {
                recipe_id,
                tag_id: tag.get(),
            })
            .collect()
    }

    fn ingredient_rows(&self, recipe_id: i64) -> Vec<NewRecipeIngredientRow> {
        self.amounts
            .iter()
            .map(|&(ingredient_id, amount)| NewRecipeIngredientRow {
                recipe_id,
                ingredient_id,
                amount,
            })
            .collect()
    }
}

async fn insert_join_rows(
    conn: &mut AsyncPgConnection,
    columns: &DraftColumns<'_>,
    recipe_id: i64,
) -> Result<(), diesel::result::Error> {
    diesel::insert_into(recipe_tags::table)
        .values(&columns.tag_rows(recipe_id))
        .execute(conn)
        .await?;
    diesel::insert_into(recipe_ingredients::table)
        .values(&columns.ingredient_rows(recipe_id))
        .execute(conn)
        .await?;
    Ok(())
}

/// Apply listing filters to a boxed recipes query.
macro_rules! filter_recipes {
    ($query:expr, $filter:expr, $viewer:expr) => {{
        let mut query = $query;
        let filter: &RecipeFilter = $filter;
        if !filter.tags.is_empty() {
            let slugs: Vec<String> = filter.tags.iter().map(|slug| slug.as_str().to_owned()).collect();
            query = query.filter(
                recipes::id.eq_any(
                    recipe_tags::table
                        .inner_join(tags::table)
                        .filter(tags::slug.eq_any(slugs))
                        .select(recipe_tags::recipe_id),
                ),
            );
        }
        if let Some(author) = filter.author {
            query = query.filter(recipes::author_id.eq(author.get()));
        }
        if let Some(viewer) = $viewer {
            let viewer: i64 = viewer.get();
            match filter.is_favorited {
                Some(true) => {
                    query = query.filter(
                        recipes::id.eq_any(
                            favorite_recipes::table
                                .filter(favorite_recipes::user_id.eq(viewer))
                                .select(favorite_recipes::recipe_id),
                        ),
                    );
                }
                Some(false) => {
                    query = query.filter(
                        recipes::id.ne_all(
                            favorite_recipes::table
                                .filter(favorite_recipes::user_id.eq(viewer))
                                .select(favorite_recipes::recipe_id),
                        ),
                    );
                }
                None => {}
            }
            match filter.is_in_shopping_cart {
                Some(true) => {
                    query = query.filter(
                        recipes::id.eq_any(
                            shopping_cart::table
                                .filter(shopping_cart::user_id.eq(viewer))
                                .select(shopping_cart::recipe_id),
                        ),
                    );
                }
                Some(false) => {
                    query = query.filter(
                        recipes::id.ne_all(
                            shopping_cart::table
                                .filter(shopping_cart::user_id.eq(viewer))
                                .select(shopping_cart::recipe_id),
                        ),
                    );
                }
                None => {}
            }
        }
        query
    }};
}

#[async_trait]
impl RecipeRepository for DieselRecipeRepository {
    async fn create(
        &self,
        author: UserId,
        draft: &RecipeDraft,
    ) -> Result<RecipeId, RecipeRepositoryError> {
        let columns = DraftColumns::new(draft)?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let new_row = NewRecipeRow {
            author_id: author.get(),
            name: draft.name(),
            image: draft.image().map(|path| path.as_str()),
            text: draft.text(),
            cooking_time: columns.cooking_time,
        };

        let id = conn
            .transaction::<_, diesel::result::Error, _>(|conn| {
                async move {
                    let id: i64 = diesel::insert_into(recipes::table)
                        .values(&new_row)
                        .returning(recipes::id)
                        .get_result(conn)
                        .await?;
                    insert_join_rows(conn, &columns, id).await?;
                    Ok(id)
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;
        Ok(RecipeId::new(id))
    }

    async fn update(
        &self,
        id: RecipeId,
        draft: &RecipeDraft,
    ) -> Result<bool, RecipeRepositoryError> {
        let columns = DraftColumns::new(draft)?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = RecipeChangeset {
            name: draft.name(),
            image: draft.image().map(|path| path.as_str()),
            text: draft.text(),
            cooking_time: columns.cooking_time,
        };
        let recipe_id = id.get();

        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            async move {
                let updated = diesel::update(recipes::table.find(recipe_id))
                    .set(&changes)
                    .execute(conn)
                    .await?;
                if updated == 0 {
                    return Ok(false);
                }
                diesel::delete(recipe_tags::table.filter(recipe_tags::recipe_id.eq(recipe_id)))
                    .execute(conn)
                    .await?;
                diesel::delete(
                    recipe_ingredients::table.filter(recipe_ingredients::recipe_id.eq(recipe_id)),
                )
                .execute(conn)
                .await?;
                insert_join_rows(conn, &columns, recipe_id).await?;
                Ok(true)
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn delete(&self, id: RecipeId) -> Result<bool, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let recipe_id = id.get();

        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            async move {
                diesel::delete(recipe_tags::table.filter(recipe_tags::recipe_id.eq(recipe_id)))
                    .execute(conn)
                    .await?;
                diesel::delete(
                    recipe_ingredients::table.filter(recipe_ingredients::recipe_id.eq(recipe_id)),
                )
                .execute(conn)
                .await?;
                diesel::delete(
                    favorite_recipes::table.filter(favorite_recipes::recipe_id.eq(recipe_id)),
                )
                .execute(conn)
                .await?;
                diesel::delete(shopping_cart::table.filter(shopping_cart::recipe_id.eq(recipe_id)))
                    .execute(conn)
                    .await?;
                let deleted = diesel::delete(recipes::table.find(recipe_id))
                    .execute(conn)
                    .await?;
                Ok(deleted == 1)
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn find(&self, id: RecipeId) -> Result<Option<Recipe>, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let recipe_id = id.get();

        let loaded = conn
            .transaction::<_, diesel::result::Error, _>(|conn| {
                async move {
                    let Some(row) = recipes::table
                        .find(recipe_id)
                        .select(RecipeRow::as_select())
                        .first::<RecipeRow>(conn)
                        .await
                        .optional()?
                    else {
                        return Ok(None);
                    };
                    let tag_ids: Vec<i64> = recipe_tags::table
                        .filter(recipe_tags::recipe_id.eq(recipe_id))
                        .order(recipe_tags::id.asc())
                        .select(recipe_tags::tag_id)
                        .load(conn)
                        .await?;
                    let portions: Vec<(i64, i32)> = recipe_ingredients::table
                        .filter(recipe_ingredients::recipe_id.eq(recipe_id))
                        .order(recipe_ingredients::id.asc())
                        .select((recipe_ingredients::ingredient_id, recipe_ingredients::amount))
                        .load(conn)
                        .await?;
                    Ok(Some((row, tag_ids, portions)))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        let Some((row, tag_ids, portions)) = loaded else {
            return Ok(None);
        };
        let ingredients = portions
            .into_iter()
            .map(|(ingredient_id, amount)| {
                u32::try_from(amount)
                    .map(|amount| IngredientPortion {
                        ingredient_id: IngredientId::new(ingredient_id),
                        amount,
                    })
                    .map_err(|_| format!("negative amount: {amount}"))
            })
            .collect::<Result<Vec<_>, _>>()
            .map_err(map_row_error)?;

        Ok(Some(Recipe {
            id: RecipeId::new(row.id),
            author_id: UserId::new(row.author_id),
            image: row.image().map_err(map_row_error)?,
            cooking_time: row.cooking_time().map_err(map_row_error)?,
            tags: tag_ids.into_iter().map(TagId::new).collect(),
            ingredients,
            name: row.name,
            text: row.text,
        }))
    }

    async fn find_summary(
        &self,
        id: RecipeId,
    ) -> Result<Option<RecipeSummary>, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<RecipeRow> = recipes::table
            .find(id.get())
            .select(RecipeRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(|row| row.summary().map_err(map_row_error))
            .transpose()
    }

    async fn find_view(
        &self,
        id: RecipeId,
        viewer: Option<UserId>,
    ) -> Result<Option<RecipeView>, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let recipe_id = id.get();

        let views = conn
            .transaction::<_, ReadError, _>(|conn| {
                async move {
                    let rows: Vec<RecipeRow> = recipes::table
                        .find(recipe_id)
                        .select(RecipeRow::as_select())
                        .load(conn)
                        .await?;
                    read_models::recipe_views(conn, viewer, rows).await
                }
                .scope_boxed()
            })
            .await
            .map_err(map_read_error)?;
        Ok(views.into_iter().next())
    }

    async fn list(
        &self,
        filter: &RecipeFilter,
        viewer: Option<UserId>,
        offset: u64,
        limit: u32,
    ) -> Result<Listing<RecipeView>, RecipeRepositoryError> {
        let offset = i64::try_from(offset)
            .map_err(|_| RecipeRepositoryError::query("offset out of range"))?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let (total, views) = conn
            .transaction::<_, ReadError, _>(|conn| {
                async move {
                    let total: i64 = filter_recipes!(
                        recipes::table.select(count_star()).into_boxed(),
                        filter,
                        viewer
                    )
                    .get_result(conn)
                    .await?;
                    let rows: Vec<RecipeRow> = filter_recipes!(
                        recipes::table.select(RecipeRow::as_select()).into_boxed(),
                        filter,
                        viewer
                    )
                    .order(recipes::id.desc())
                    .offset(offset)
                    .limit(i64::from(limit))
                    .load(conn)
                    .await?;
                    let views = read_models::recipe_views(conn, viewer, rows).await?;
                    Ok((total, views))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_read_error)?;

        Ok(Listing::new(u64::try_from(total).unwrap_or(0), views))
    }
}
