//! Port for the favourite and shopping-cart relations.

use async_trait::async_trait;

use crate::domain::{CartPortion, MembershipKind, RecipeId, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by membership repository adapters.
    pub enum MembershipRepositoryError {
        /// Repository connection could not be established.
        Connection => "membership repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query => "membership repository query failed: {message}",
        /// The `(user, recipe)` pair already exists.
        Duplicate => "membership already exists: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MembershipRepository: Send + Sync {
    /// Insert the pair; fails with `Duplicate` when it is already present.
    ///
    /// Uniqueness is enforced by the store so concurrent inserts of the same
    /// pair cannot both succeed.
    async fn add(
        &self,
        kind: MembershipKind,
        user: UserId,
        recipe: RecipeId,
    ) -> Result<(), MembershipRepositoryError>;

    /// Delete the pair. Returns `false` when it did not exist.
    async fn remove(
        &self,
        kind: MembershipKind,
        user: UserId,
        recipe: RecipeId,
    ) -> Result<bool, MembershipRepositoryError>;

    async fn contains(
        &self,
        kind: MembershipKind,
        user: UserId,
        recipe: RecipeId,
    ) -> Result<bool, MembershipRepositoryError>;

    /// Every ingredient occurrence across the user's cart recipes, read from
    /// one consistent snapshot.
    async fn cart_portions(&self, user: UserId)
    -> Result<Vec<CartPortion>, MembershipRepositoryError>;
}
