//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod accounts_command;
mod catalogue_query;
mod catalogue_repository;
mod image_store;
mod listing;
mod membership_command;
mod membership_repository;
mod password_hasher;
mod recipe_repository;
mod recipes_command;
mod recipes_query;
mod shopping_list_query;
mod short_hash_generator;
mod short_link_command;
mod short_link_repository;
mod subscription_repository;
mod subscriptions_command;
mod user_repository;
mod users_query;

pub use accounts_command::AccountsCommand;
#[cfg(test)]
pub use accounts_command::MockAccountsCommand;
pub use catalogue_query::CatalogueQuery;
#[cfg(test)]
pub use catalogue_query::MockCatalogueQuery;
#[cfg(test)]
pub use catalogue_repository::MockCatalogueRepository;
pub use catalogue_repository::{CatalogueRepository, CatalogueRepositoryError};
#[cfg(test)]
pub use image_store::MockImageStore;
pub use image_store::{ImageStore, ImageStoreError};
pub use listing::Listing;
pub use membership_command::MembershipCommand;
#[cfg(test)]
pub use membership_command::MockMembershipCommand;
#[cfg(test)]
pub use membership_repository::MockMembershipRepository;
pub use membership_repository::{MembershipRepository, MembershipRepositoryError};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHasher, PasswordHasherError};
#[cfg(test)]
pub use recipe_repository::MockRecipeRepository;
pub use recipe_repository::{RecipeRepository, RecipeRepositoryError};
#[cfg(test)]
pub use recipes_command::MockRecipesCommand;
pub use recipes_command::RecipesCommand;
#[cfg(test)]
pub use recipes_query::MockRecipesQuery;
pub use recipes_query::RecipesQuery;
#[cfg(test)]
pub use shopping_list_query::MockShoppingListQuery;
pub use shopping_list_query::ShoppingListQuery;
#[cfg(test)]
pub use short_hash_generator::MockShortHashGenerator;
pub use short_hash_generator::ShortHashGenerator;
#[cfg(test)]
pub use short_link_command::MockShortLinkCommand;
pub use short_link_command::ShortLinkCommand;
#[cfg(test)]
pub use short_link_repository::MockShortLinkRepository;
pub use short_link_repository::{ShortLinkRepository, ShortLinkRepositoryError};
#[cfg(test)]
pub use subscription_repository::MockSubscriptionRepository;
pub use subscription_repository::{SubscriptionRepository, SubscriptionRepositoryError};
#[cfg(test)]
pub use subscriptions_command::MockSubscriptionsCommand;
pub use subscriptions_command::SubscriptionsCommand;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
#[cfg(test)]
pub use users_query::MockUsersQuery;
pub use users_query::UsersQuery;
