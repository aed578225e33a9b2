//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, RunQueryDsl};

use crate::domain::ports::{Listing, UserPersistenceError, UserRepository};
use crate::domain::{Email, ImagePath, PasswordHash, Registration, User, UserCard, UserId};

use super::diesel_basic_error_mapping::{ReadError, repository_error_mappers};
use super::models::{NewUserRow, UserRow};
use super::pool::DbPool;
use super::read_models;
use super::schema::users;

/// Diesel-backed account storage.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

repository_error_mappers!(UserPersistenceError);

/// Name the taken field instead of the violated constraint.
fn describe_duplicate(error: UserPersistenceError) -> UserPersistenceError {
    match error {
        UserPersistenceError::Duplicate { message } => {
            let friendly = match message.as_str() {
                "users_email_key" => "a user with this email already exists",
                "users_username_key" => "a user with this username already exists",
                _ => return UserPersistenceError::duplicate(message),
            };
            UserPersistenceError::duplicate(friendly)
        }
        other => other,
    }
}

fn to_user(row: UserRow) -> Result<User, UserPersistenceError> {
    User::try_from(row).map_err(map_row_error)
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn create(
        &self,
        registration: &Registration,
        password_hash: &PasswordHash,
    ) -> Result<User, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let new_row = NewUserRow {
            email: registration.email.as_str(),
            username: registration.username.as_str(),
            first_name: &registration.first_name,
            last_name: &registration.last_name,
            password_hash: password_hash.as_str(),
        };
        let row: UserRow = diesel::insert_into(users::table)
            .values(&new_row)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| describe_duplicate(map_diesel_error(err)))?;
        to_user(row)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = users::table
            .find(id.get())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(to_user).transpose()
    }

    async fn find_credentials(
        &self,
        email: &Email,
    ) -> Result<Option<(User, PasswordHash)>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<(UserRow, String)> = users::table
            .filter(users::email.eq(email.as_str()))
            .select((UserRow::as_select(), users::password_hash))
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(|(row, hash)| to_user(row).map(|user| (user, PasswordHash::new(hash))))
            .transpose()
    }

    async fn password_hash(
        &self,
        id: UserId,
    ) -> Result<Option<PasswordHash>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let hash: Option<String> = users::table
            .find(id.get())
            .select(users::password_hash)
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(hash.map(PasswordHash::new))
    }

    async fn set_password_hash(
        &self,
        id: UserId,
        password_hash: &PasswordHash,
    ) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(users::table.find(id.get()))
            .set(users::password_hash.eq(password_hash.as_str()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        if updated == 0 {
            return Err(UserPersistenceError::query(format!("user {id} not found")));
        }
        Ok(())
    }

    async fn replace_avatar(
        &self,
        id: UserId,
        avatar: Option<ImagePath>,
    ) -> Result<Option<ImagePath>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let user_id = id.get();
        let new_avatar = avatar.map(|path| path.as_str().to_owned());

        let previous: Option<String> = conn
            .transaction::<_, diesel::result::Error, _>(|conn| {
                async move {
                    let previous: Option<String> = users::table
                        .find(user_id)
                        .select(users::avatar)
                        .for_update()
                        .first(conn)
                        .await?;
                    diesel::update(users::table.find(user_id))
                        .set(users::avatar.eq(new_avatar))
                        .execute(conn)
                        .await?;
                    Ok(previous)
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        previous
            .filter(|path| !path.is_empty())
            .map(|path| ImagePath::new(path).map_err(|err| map_row_error(err.to_string())))
            .transpose()
    }

    async fn find_card(
        &self,
        viewer: Option<UserId>,
        id: UserId,
    ) -> Result<Option<UserCard>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut cards = read_models::user_cards(&mut conn, viewer, &[id.get()])
            .await
            .map_err(map_read_error)?;
        Ok(cards.remove(&id.get()))
    }

    async fn list_cards(
        &self,
        viewer: Option<UserId>,
        offset: u64,
        limit: u32,
    ) -> Result<Listing<UserCard>, UserPersistenceError> {
        let offset =
            i64::try_from(offset).map_err(|_| UserPersistenceError::query("offset out of range"))?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let (total, cards) = conn
            .transaction::<_, ReadError, _>(|conn| {
                async move {
                    let total: i64 = users::table.count().get_result(conn).await?;
                    let ids: Vec<i64> = users::table
                        .order(users::id.asc())
                        .offset(offset)
                        .limit(i64::from(limit))
                        .select(users::id)
                        .load(conn)
                        .await?;
                    let mut by_id = read_models::user_cards(conn, viewer, &ids).await?;
                    let cards: Vec<UserCard> =
                        ids.iter().filter_map(|id| by_id.remove(id)).collect();
                    Ok((total, cards))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_read_error)?;

        Ok(Listing::new(u64::try_from(total).unwrap_or(0), cards))
    }
}
