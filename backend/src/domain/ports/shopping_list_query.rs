//! Driving port for the shopping-list export.

use async_trait::async_trait;

use crate::domain::{Error, ShoppingList, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ShoppingListQuery: Send + Sync {
    /// Aggregate the ingredients of every recipe in the user's cart.
    async fn shopping_list(&self, user: UserId) -> Result<ShoppingList, Error>;
}
