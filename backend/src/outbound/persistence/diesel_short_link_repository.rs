//! PostgreSQL-backed `ShortLinkRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ShortLinkRepository, ShortLinkRepositoryError};
use crate::domain::{OriginalUrl, ShortHash, ShortLink};

use super::diesel_basic_error_mapping::repository_error_mappers;
use super::models::{NewShortLinkRow, ShortLinkRow};
use super::pool::DbPool;
use super::schema::short_links;

/// Diesel-backed short-link storage.
#[derive(Clone)]
pub struct DieselShortLinkRepository {
    pool: DbPool,
}

impl DieselShortLinkRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

repository_error_mappers!(ShortLinkRepositoryError);

fn to_link(row: ShortLinkRow) -> Result<ShortLink, ShortLinkRepositoryError> {
    ShortLink::try_from(row).map_err(map_row_error)
}

#[async_trait]
impl ShortLinkRepository for DieselShortLinkRepository {
    async fn find_by_url(
        &self,
        url: &OriginalUrl,
    ) -> Result<Option<ShortLink>, ShortLinkRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<ShortLinkRow> = short_links::table
            .filter(short_links::original_url.eq(url.as_str()))
            .select(ShortLinkRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(to_link).transpose()
    }

    async fn find_by_hash(
        &self,
        hash: &ShortHash,
    ) -> Result<Option<ShortLink>, ShortLinkRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<ShortLinkRow> = short_links::table
            .filter(short_links::url_hash.eq(hash.as_str()))
            .select(ShortLinkRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(to_link).transpose()
    }

    async fn insert_if_absent(&self, link: &ShortLink) -> Result<bool, ShortLinkRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let inserted = diesel::insert_into(short_links::table)
            .values(&NewShortLinkRow {
                original_url: link.original_url.as_str(),
                url_hash: link.url_hash.as_str(),
            })
            .on_conflict_do_nothing()
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(inserted == 1)
    }
}
