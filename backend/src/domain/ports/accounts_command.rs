//! Driving port for account lifecycle operations.
//!
//! HTTP handlers call this port to register users, check login credentials
//! and manage passwords and avatars without knowing how credentials are
//! hashed or where images are kept.

use async_trait::async_trait;

use crate::domain::{Error, ImageInput, ImagePath, LoginCredentials, Registration, User, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountsCommand: Send + Sync {
    /// Create an account. Taken emails or usernames are conflicts.
    async fn register(&self, registration: Registration) -> Result<User, Error>;

    /// Validate credentials and return the authenticated user id.
    async fn login(&self, credentials: LoginCredentials) -> Result<UserId, Error>;

    /// Replace the password after checking the current one.
    async fn change_password(
        &self,
        user: UserId,
        current_password: String,
        new_password: String,
    ) -> Result<(), Error>;

    /// Store and attach a new avatar, returning its path.
    async fn set_avatar(&self, user: UserId, image: ImageInput) -> Result<ImagePath, Error>;

    async fn clear_avatar(&self, user: UserId) -> Result<(), Error>;
}
