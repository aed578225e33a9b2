//! Translation of driven-port failures into API errors.
//!
//! Connection failures become `service_unavailable`; everything else a
//! repository reports unexpectedly becomes `internal`. `Duplicate` variants
//! usually need a message naming the entity, so services match on them
//! before falling back to these conversions.

use super::Error;
use super::ports::{
    CatalogueRepositoryError, ImageStoreError, MembershipRepositoryError, PasswordHasherError,
    RecipeRepositoryError, ShortLinkRepositoryError, SubscriptionRepositoryError,
    UserPersistenceError,
};

macro_rules! connection_or_query {
    ($error:ident, $label:literal $(, $extra:ident => $conflict:expr)?) => {
        impl From<$error> for Error {
            fn from(value: $error) -> Self {
                match value {
                    $error::Connection { message } => {
                        Error::service_unavailable(format!(concat!($label, " unavailable: {}"), message))
                    }
                    $error::Query { message } => {
                        Error::internal(format!(concat!($label, " error: {}"), message))
                    }
                    $($error::$extra { message } => $conflict(message),)?
                }
            }
        }
    };
}

connection_or_query!(CatalogueRepositoryError, "catalogue repository");
connection_or_query!(RecipeRepositoryError, "recipe repository");
connection_or_query!(ShortLinkRepositoryError, "short link repository");
connection_or_query!(
    MembershipRepositoryError,
    "membership repository",
    Duplicate => Error::conflict
);
connection_or_query!(
    SubscriptionRepositoryError,
    "subscription repository",
    Duplicate => Error::conflict
);
connection_or_query!(
    UserPersistenceError,
    "user repository",
    Duplicate => Error::conflict
);

impl From<ImageStoreError> for Error {
    fn from(value: ImageStoreError) -> Self {
        Error::internal(value.to_string())
    }
}

impl From<PasswordHasherError> for Error {
    fn from(value: PasswordHasherError) -> Self {
        Error::internal(value.to_string())
    }
}
