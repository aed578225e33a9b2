//! Shopping-list export.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{MembershipRepository, ShoppingListQuery};
use crate::domain::{Error, ShoppingList, UserId};

/// Aggregates a user's cart into a [`ShoppingList`].
#[derive(Clone)]
pub struct ShoppingListService<M> {
    memberships: Arc<M>,
}

impl<M> ShoppingListService<M> {
    pub fn new(memberships: Arc<M>) -> Self {
        Self { memberships }
    }
}

#[async_trait]
impl<M> ShoppingListQuery for ShoppingListService<M>
where
    M: MembershipRepository,
{
    async fn shopping_list(&self, user: UserId) -> Result<ShoppingList, Error> {
        let portions = self.memberships.cart_portions(user).await?;
        Ok(ShoppingList::aggregate(portions))
    }
}
