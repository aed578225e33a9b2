//! Port abstraction for user persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{Email, ImagePath, PasswordHash, Registration, User, UserCard, UserId};

use super::{Listing, define_port_error};

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query => "user repository query failed: {message}",
        /// Email or username is already taken.
        Duplicate => "user already exists: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new account.
    async fn create(
        &self,
        registration: &Registration,
        password_hash: &PasswordHash,
    ) -> Result<User, UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch the user and stored hash for a login email.
    async fn find_credentials(
        &self,
        email: &Email,
    ) -> Result<Option<(User, PasswordHash)>, UserPersistenceError>;

    async fn password_hash(&self, id: UserId)
    -> Result<Option<PasswordHash>, UserPersistenceError>;

    async fn set_password_hash(
        &self,
        id: UserId,
        password_hash: &PasswordHash,
    ) -> Result<(), UserPersistenceError>;

    /// Replace the avatar and return the previous one.
    async fn replace_avatar(
        &self,
        id: UserId,
        avatar: Option<ImagePath>,
    ) -> Result<Option<ImagePath>, UserPersistenceError>;

    /// Fetch a user card as seen by `viewer`.
    async fn find_card(
        &self,
        viewer: Option<UserId>,
        id: UserId,
    ) -> Result<Option<UserCard>, UserPersistenceError>;

    /// Page of user cards ordered by id.
    async fn list_cards(
        &self,
        viewer: Option<UserId>,
        offset: u64,
        limit: u32,
    ) -> Result<Listing<UserCard>, UserPersistenceError>;
}
