//! PostgreSQL-backed `SubscriptionRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, RunQueryDsl};

use crate::domain::ports::{Listing, SubscriptionRepository, SubscriptionRepositoryError};
use crate::domain::{AuthorCard, Subscription, UserId};

use super::diesel_basic_error_mapping::{ReadError, repository_error_mappers};
use super::pool::DbPool;
use super::read_models;
use super::schema::subscriptions;

/// Diesel-backed follow edges.
#[derive(Clone)]
pub struct DieselSubscriptionRepository {
    pool: DbPool,
}

impl DieselSubscriptionRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

repository_error_mappers!(SubscriptionRepositoryError);

#[async_trait]
impl SubscriptionRepository for DieselSubscriptionRepository {
    async fn add(&self, edge: Subscription) -> Result<(), SubscriptionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(subscriptions::table)
            .values((
                subscriptions::user_id.eq(edge.user.get()),
                subscriptions::author_id.eq(edge.author.get()),
            ))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn remove(&self, edge: Subscription) -> Result<bool, SubscriptionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(
            subscriptions::table
                .filter(subscriptions::user_id.eq(edge.user.get()))
                .filter(subscriptions::author_id.eq(edge.author.get())),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }

    async fn author_card(
        &self,
        viewer: UserId,
        author: UserId,
        recipes_limit: u32,
    ) -> Result<Option<AuthorCard>, SubscriptionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let cards = conn
            .transaction::<_, ReadError, _>(|conn| {
                async move {
                    read_models::author_cards(conn, Some(viewer), &[author.get()], recipes_limit)
                        .await
                }
                .scope_boxed()
            })
            .await
            .map_err(map_read_error)?;
        Ok(cards.into_iter().next())
    }

    async fn list(
        &self,
        user: UserId,
        offset: u64,
        limit: u32,
        recipes_limit: u32,
    ) -> Result<Listing<AuthorCard>, SubscriptionRepositoryError> {
        let offset = i64::try_from(offset)
            .map_err(|_| SubscriptionRepositoryError::query("offset out of range"))?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let (total, cards) = conn
            .transaction::<_, ReadError, _>(|conn| {
                async move {
                    let total: i64 = subscriptions::table
                        .filter(subscriptions::user_id.eq(user.get()))
                        .count()
                        .get_result(conn)
                        .await?;
                    let author_ids: Vec<i64> = subscriptions::table
                        .filter(subscriptions::user_id.eq(user.get()))
                        .order(subscriptions::author_id.asc())
                        .offset(offset)
                        .limit(i64::from(limit))
                        .select(subscriptions::author_id)
                        .load(conn)
                        .await?;
                    let cards =
                        read_models::author_cards(conn, Some(user), &author_ids, recipes_limit)
                            .await?;
                    Ok((total, cards))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_read_error)?;

        Ok(Listing::new(u64::try_from(total).unwrap_or(0), cards))
    }
}
