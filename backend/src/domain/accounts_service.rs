//! Account lifecycle and profile queries.

use std::sync::Arc;

use async_trait::async_trait;
use pagination::PageRequest;
use serde_json::json;
use tracing::warn;

use crate::domain::ports::{
    AccountsCommand, ImageStore, Listing, PasswordHasher, UserRepository, UsersQuery,
};
use crate::domain::{
    Error, ImageFolder, ImageInput, ImagePath, LoginCredentials, Registration, User, UserCard,
    UserId,
};

/// Account service implementing [`AccountsCommand`] and [`UsersQuery`].
#[derive(Clone)]
pub struct AccountsService<U, H, I> {
    users: Arc<U>,
    hasher: Arc<H>,
    images: Arc<I>,
}

impl<U, H, I> AccountsService<U, H, I> {
    pub fn new(users: Arc<U>, hasher: Arc<H>, images: Arc<I>) -> Self {
        Self {
            users,
            hasher,
            images,
        }
    }
}

fn invalid_credentials() -> Error {
    Error::unauthorized("invalid credentials")
}

fn user_not_found(id: UserId) -> Error {
    Error::not_found(format!("user {id} not found"))
}

impl<U, H, I> AccountsService<U, H, I>
where
    U: UserRepository,
    H: PasswordHasher,
    I: ImageStore,
{
    async fn discard_image(&self, image: Option<ImagePath>) {
        let Some(image) = image else {
            return;
        };
        if let Err(error) = self.images.remove(&image).await {
            warn!(%error, image = %image, "failed to remove replaced avatar");
        }
    }
}

#[async_trait]
impl<U, H, I> AccountsCommand for AccountsService<U, H, I>
where
    U: UserRepository,
    H: PasswordHasher,
    I: ImageStore,
{
    async fn register(&self, registration: Registration) -> Result<User, Error> {
        let password_hash = self.hasher.hash(registration.password())?;
        Ok(self.users.create(&registration, &password_hash).await?)
    }

    async fn login(&self, credentials: LoginCredentials) -> Result<UserId, Error> {
        let Some((user, password_hash)) =
            self.users.find_credentials(credentials.email()).await?
        else {
            return Err(invalid_credentials());
        };
        if self.hasher.verify(credentials.password(), &password_hash)? {
            Ok(user.id)
        } else {
            Err(invalid_credentials())
        }
    }

    async fn change_password(
        &self,
        user: UserId,
        current_password: String,
        new_password: String,
    ) -> Result<(), Error> {
        if new_password.is_empty() {
            return Err(Error::invalid_request("new_password must not be empty")
                .with_details(json!({ "field": "new_password", "code": "empty" })));
        }
        let stored = self
            .users
            .password_hash(user)
            .await?
            .ok_or_else(|| Error::unauthorized("login required"))?;
        if !self.hasher.verify(&current_password, &stored)? {
            return Err(Error::invalid_request("current password is incorrect")
                .with_details(json!({ "field": "current_password", "code": "mismatch" })));
        }
        let replacement = self.hasher.hash(&new_password)?;
        Ok(self.users.set_password_hash(user, &replacement).await?)
    }

    async fn set_avatar(&self, user: UserId, image: ImageInput) -> Result<ImagePath, Error> {
        let ImageInput::Inline(inline) = image else {
            return Err(Error::invalid_request("avatar must be a base64 data URI")
                .with_details(json!({ "field": "avatar", "code": "unknown_reference" })));
        };
        let path = self.images.store(ImageFolder::Avatars, &inline).await?;
        match self.users.replace_avatar(user, Some(path.clone())).await {
            Ok(previous) => {
                self.discard_image(previous).await;
                Ok(path)
            }
            Err(error) => {
                self.discard_image(Some(path)).await;
                Err(error.into())
            }
        }
    }

    async fn clear_avatar(&self, user: UserId) -> Result<(), Error> {
        let previous = self.users.replace_avatar(user, None).await?;
        self.discard_image(previous).await;
        Ok(())
    }
}

#[async_trait]
impl<U, H, I> UsersQuery for AccountsService<U, H, I>
where
    U: UserRepository,
    H: PasswordHasher,
    I: ImageStore,
{
    async fn me(&self, user: UserId) -> Result<UserCard, Error> {
        self.users
            .find_card(Some(user), user)
            .await?
            .ok_or_else(|| Error::unauthorized("login required"))
    }

    async fn get(&self, viewer: Option<UserId>, id: UserId) -> Result<UserCard, Error> {
        self.users
            .find_card(viewer, id)
            .await?
            .ok_or_else(|| user_not_found(id))
    }

    async fn list(
        &self,
        viewer: Option<UserId>,
        page: PageRequest,
    ) -> Result<Listing<UserCard>, Error> {
        let listing = self
            .users
            .list_cards(viewer, page.offset(), page.limit())
            .await?;
        page.ensure_within(listing.total)
            .map_err(|error| Error::not_found(error.to_string()))?;
        Ok(listing)
    }
}

#[cfg(test)]
#[path = "accounts_service_tests.rs"]
mod tests;
