//! Driving port for user-facing profile queries.

use async_trait::async_trait;
use pagination::PageRequest;

use crate::domain::{Error, UserCard, UserId};

use super::Listing;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersQuery: Send + Sync {
    /// Profile of the authenticated user.
    async fn me(&self, user: UserId) -> Result<UserCard, Error>;

    /// Profile of `id` as seen by `viewer`.
    async fn get(&self, viewer: Option<UserId>, id: UserId) -> Result<UserCard, Error>;

    async fn list(
        &self,
        viewer: Option<UserId>,
        page: PageRequest,
    ) -> Result<Listing<UserCard>, Error>;
}
