//! PostgreSQL-backed `CatalogueRepository` implementation using Diesel ORM.

use std::collections::BTreeSet;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{CatalogueRepository, CatalogueRepositoryError};
use crate::domain::{Ingredient, IngredientId, Tag, TagId};

use super::diesel_basic_error_mapping::repository_error_mappers;
use super::models::{IngredientRow, TagRow};
use super::pool::DbPool;
use super::schema::{ingredients, tags};

/// Diesel-backed catalogue reads.
#[derive(Clone)]
pub struct DieselCatalogueRepository {
    pool: DbPool,
}

impl DieselCatalogueRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

repository_error_mappers!(CatalogueRepositoryError);

/// Escape `LIKE` wildcards so a user-supplied prefix matches literally.
fn like_prefix(prefix: &str) -> String {
    let mut pattern = String::with_capacity(prefix.len() + 1);
    for ch in prefix.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

/// Requested ids that were not found, ascending and without repeats.
fn missing_ids(requested: impl IntoIterator<Item = i64>, found: &[i64]) -> Vec<i64> {
    let found: BTreeSet<i64> = found.iter().copied().collect();
    requested
        .into_iter()
        .filter(|id| !found.contains(id))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn to_tag(row: TagRow) -> Result<Tag, CatalogueRepositoryError> {
    Tag::try_from(row).map_err(map_row_error)
}

#[async_trait]
impl CatalogueRepository for DieselCatalogueRepository {
    async fn list_tags(&self) -> Result<Vec<Tag>, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<TagRow> = tags::table
            .order((tags::name.asc(), tags::id.asc()))
            .select(TagRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(to_tag).collect()
    }

    async fn find_tag(&self, id: TagId) -> Result<Option<Tag>, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<TagRow> = tags::table
            .find(id.get())
            .select(TagRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(to_tag).transpose()
    }

    async fn list_ingredients(
        &self,
        name_prefix: Option<String>,
    ) -> Result<Vec<Ingredient>, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut query = ingredients::table
            .order((ingredients::name.asc(), ingredients::id.asc()))
            .select(IngredientRow::as_select())
            .into_boxed();
        if let Some(prefix) = name_prefix {
            query = query.filter(ingredients::name.like(like_prefix(&prefix)));
        }
        let rows: Vec<IngredientRow> = query.load(&mut conn).await.map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(Ingredient::from).collect())
    }

    async fn find_ingredient(
        &self,
        id: IngredientId,
    ) -> Result<Option<Ingredient>, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<IngredientRow> = ingredients::table
            .find(id.get())
            .select(IngredientRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Ingredient::from))
    }

    async fn missing_tag_ids(&self, ids: &[TagId]) -> Result<Vec<TagId>, CatalogueRepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let requested: Vec<i64> = ids.iter().map(|id| id.get()).collect();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let found: Vec<i64> = tags::table
            .filter(tags::id.eq_any(&requested))
            .select(tags::id)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(missing_ids(requested, &found)
            .into_iter()
            .map(TagId::new)
            .collect())
    }

    async fn missing_ingredient_ids(
        &self,
        ids: &[IngredientId],
    ) -> Result<Vec<IngredientId>, CatalogueRepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let requested: Vec<i64> = ids.iter().map(|id| id.get()).collect();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let found: Vec<i64> = ingredients::table
            .filter(ingredients::id.eq_any(&requested))
            .select(ingredients::id)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(missing_ids(requested, &found)
            .into_iter()
            .map(IngredientId::new)
            .collect())
    }
}
