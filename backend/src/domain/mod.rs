//! Domain primitives, aggregates and services.
//!
//! Purpose: define strongly typed recipe-sharing entities and the services
//! that enforce their consistency rules. Inbound adapters talk to the
//! services through the driving ports in [`ports`]; services reach storage
//! through the driven ports in the same module.
//!
//! Public surface:
//! - Error (alias to `error::Error`): API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`): stable error identifier.
//! - RecipeDraft / RecipeView: recipe write and read models.
//! - ShoppingList: consolidated cart ingredients.

pub mod catalogue;
pub mod error;
pub mod ids;
pub mod image;
pub mod membership;
pub mod ports;
pub mod recipe;
pub mod shopping_list;
pub mod short_link;
pub mod subscription;
pub mod trace_id;
pub mod user;

mod accounts_service;
mod catalogue_service;
mod membership_service;
mod port_errors;
mod recipe_service;
mod shopping_list_service;
mod short_link_service;
mod slug;
mod subscription_service;

pub use self::accounts_service::AccountsService;
pub use self::catalogue::{CatalogueValidationError, Ingredient, Tag, TagSlug};
pub use self::catalogue_service::CatalogueService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::ids::{IdParseError, IngredientId, RecipeId, TagId, UserId};
pub use self::image::{ImageFolder, ImageInput, ImageInputError, ImagePath, InlineImage};
pub use self::membership::MembershipKind;
pub use self::membership_service::MembershipService;
pub use self::recipe::{
    IngredientPortion, PortionInput, Recipe, RecipeDraft, RecipeFilter, RecipeIngredientView,
    RecipeInput, RecipeLimits, RecipePatch, RecipeSummary, RecipeValidationError, RecipeView,
};
pub use self::recipe_service::RecipeService;
pub use self::shopping_list::{CartPortion, ShoppingList, ShoppingListLine};
pub use self::shopping_list_service::ShoppingListService;
pub use self::short_link::{
    HashLength, OriginalUrl, RandomShortHashGenerator, ShortHash, ShortLink,
    ShortLinkValidationError,
};
pub use self::short_link_service::{DEFAULT_SHORT_LINK_ATTEMPTS, ShortLinkService};
pub use self::subscription::{AuthorCard, SelfSubscription, Subscription};
pub use self::subscription_service::SubscriptionService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    Email, LoginCredentials, PasswordHash, Registration, User, UserCard, UserValidationError,
    Username,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use foodgram::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
