//! Shared Diesel error mapping for repository adapters.
//!
//! Every repository port error exposes connection and query constructors;
//! ports with uniqueness semantics also expose a duplicate constructor. The
//! [`RepositoryErrorKind`] trait captures that shape so the pool and Diesel
//! mapping lives in one place.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use crate::domain::ports::{
    CatalogueRepositoryError, MembershipRepositoryError, RecipeRepositoryError,
    ShortLinkRepositoryError, SubscriptionRepositoryError, UserPersistenceError,
};

use super::pool::PoolError;

/// Constructors shared by repository port errors.
pub(crate) trait RepositoryErrorKind: Sized {
    fn connection(message: String) -> Self;
    fn query(message: String) -> Self;

    /// Unique constraint violation; ports without a duplicate variant treat it
    /// as a query failure.
    fn duplicate(message: String) -> Self {
        Self::query(message)
    }
}

macro_rules! impl_repository_error_kind {
    ($error:ident) => {
        impl RepositoryErrorKind for $error {
            fn connection(message: String) -> Self {
                $error::connection(message)
            }

            fn query(message: String) -> Self {
                $error::query(message)
            }
        }
    };
    ($error:ident, duplicate) => {
        impl RepositoryErrorKind for $error {
            fn connection(message: String) -> Self {
                $error::connection(message)
            }

            fn query(message: String) -> Self {
                $error::query(message)
            }

            fn duplicate(message: String) -> Self {
                $error::duplicate(message)
            }
        }
    };
}

impl_repository_error_kind!(CatalogueRepositoryError);
impl_repository_error_kind!(RecipeRepositoryError);
impl_repository_error_kind!(ShortLinkRepositoryError);
impl_repository_error_kind!(MembershipRepositoryError, duplicate);
impl_repository_error_kind!(SubscriptionRepositoryError, duplicate);
impl_repository_error_kind!(UserPersistenceError, duplicate);

/// Map pool errors into the repository's connection error.
pub(crate) fn pool_error<E: RepositoryErrorKind>(error: PoolError) -> E {
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    E::connection(message)
}

/// Map common Diesel error variants into repository errors.
///
/// Unique violations carry the violated constraint name so adapters can
/// translate it into a friendlier message.
pub(crate) fn diesel_error<E: RepositoryErrorKind>(error: DieselError) -> E {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => E::query("record not found".to_owned()),
        DieselError::QueryBuilderError(_) => E::query("database query error".to_owned()),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            E::connection("database connection error".to_owned())
        }
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => E::duplicate(
            info.constraint_name()
                .map_or_else(|| "unique constraint violated".to_owned(), str::to_owned),
        ),
        _ => E::query("database error".to_owned()),
    }
}

/// Map a row that failed domain validation into a query error.
pub(crate) fn row_error<E: RepositoryErrorKind>(message: String) -> E {
    debug!(%message, "stored row failed domain validation");
    E::query(format!("invalid stored row: {message}"))
}

/// Failure inside a transaction body that may also come from row conversion.
#[derive(Debug)]
pub(crate) enum ReadError {
    Diesel(DieselError),
    InvalidRow(String),
}

impl From<DieselError> for ReadError {
    fn from(error: DieselError) -> Self {
        Self::Diesel(error)
    }
}

pub(crate) fn read_error<E: RepositoryErrorKind>(error: ReadError) -> E {
    match error {
        ReadError::Diesel(error) => diesel_error(error),
        ReadError::InvalidRow(message) => row_error(message),
    }
}

/// Declare repository-local `map_*` functions bound to one port error type.
macro_rules! repository_error_mappers {
    ($error:ty) => {
        #[allow(dead_code, reason = "repositories use the subset of mappers they need")]
        fn map_pool_error(
            error: $crate::outbound::persistence::pool::PoolError,
        ) -> $error {
            $crate::outbound::persistence::diesel_basic_error_mapping::pool_error(error)
        }

        #[allow(dead_code, reason = "repositories use the subset of mappers they need")]
        fn map_diesel_error(error: ::diesel::result::Error) -> $error {
            $crate::outbound::persistence::diesel_basic_error_mapping::diesel_error(error)
        }

        #[allow(dead_code, reason = "repositories use the subset of mappers they need")]
        fn map_row_error(message: String) -> $error {
            $crate::outbound::persistence::diesel_basic_error_mapping::row_error(message)
        }

        #[allow(dead_code, reason = "repositories use the subset of mappers they need")]
        fn map_read_error(
            error: $crate::outbound::persistence::diesel_basic_error_mapping::ReadError,
        ) -> $error {
            $crate::outbound::persistence::diesel_basic_error_mapping::read_error(error)
        }
    };
}

pub(crate) use repository_error_mappers;
