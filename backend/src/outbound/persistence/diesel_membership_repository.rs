//! PostgreSQL-backed `MembershipRepository` for favorites and the cart.
//!
//! Both collections live in tables with identical shape, so every operation
//! dispatches on [`MembershipKind`] to the matching table and otherwise runs
//! the same query.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{MembershipRepository, MembershipRepositoryError};
use crate::domain::{CartPortion, MembershipKind, RecipeId, UserId};

use super::diesel_basic_error_mapping::repository_error_mappers;
use super::pool::DbPool;
use super::schema::{favorite_recipes, ingredients, recipe_ingredients, shopping_cart};

/// Diesel-backed user collections.
#[derive(Clone)]
pub struct DieselMembershipRepository {
    pool: DbPool,
}

impl DieselMembershipRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

repository_error_mappers!(MembershipRepositoryError);

/// Bind `t` to the collection table for `$kind` and evaluate `$body`.
macro_rules! with_collection {
    ($kind:expr, |$t:ident| $body:expr) => {
        match $kind {
            MembershipKind::Favorite => {
                use favorite_recipes as $t;
                $body
            }
            MembershipKind::ShoppingCart => {
                use shopping_cart as $t;
                $body
            }
        }
    };
}

#[async_trait]
impl MembershipRepository for DieselMembershipRepository {
    async fn add(
        &self,
        kind: MembershipKind,
        user: UserId,
        recipe: RecipeId,
    ) -> Result<(), MembershipRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        with_collection!(kind, |t| {
            diesel::insert_into(t::table)
                .values((t::user_id.eq(user.get()), t::recipe_id.eq(recipe.get())))
                .execute(&mut conn)
                .await
        })
        .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn remove(
        &self,
        kind: MembershipKind,
        user: UserId,
        recipe: RecipeId,
    ) -> Result<bool, MembershipRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = with_collection!(kind, |t| {
            diesel::delete(
                t::table
                    .filter(t::user_id.eq(user.get()))
                    .filter(t::recipe_id.eq(recipe.get())),
            )
            .execute(&mut conn)
            .await
        })
        .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }

    async fn contains(
        &self,
        kind: MembershipKind,
        user: UserId,
        recipe: RecipeId,
    ) -> Result<bool, MembershipRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        with_collection!(kind, |t| {
            diesel::select(diesel::dsl::exists(
                t::table
                    .filter(t::user_id.eq(user.get()))
                    .filter(t::recipe_id.eq(recipe.get())),
            ))
            .get_result::<bool>(&mut conn)
            .await
        })
        .map_err(map_diesel_error)
    }

    async fn cart_portions(
        &self,
        user: UserId,
    ) -> Result<Vec<CartPortion>, MembershipRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        // One statement, so the cart and its ingredient rows come from the
        // same snapshot.
        let rows: Vec<(String, String, i32)> = recipe_ingredients::table
            .inner_join(ingredients::table)
            .filter(
                recipe_ingredients::recipe_id.eq_any(
                    shopping_cart::table
                        .filter(shopping_cart::user_id.eq(user.get()))
                        .select(shopping_cart::recipe_id),
                ),
            )
            .select((
                ingredients::name,
                ingredients::measurement_unit,
                recipe_ingredients::amount,
            ))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter()
            .map(|(name, measurement_unit, amount)| {
                let amount = u32::try_from(amount).map_err(|_| {
                    map_row_error(format!(
                        "negative amount for {name}: {amount}"
                    ))
                })?;
                Ok(CartPortion {
                    name,
                    measurement_unit,
                    amount,
                })
            })
            .collect()
    }
}
