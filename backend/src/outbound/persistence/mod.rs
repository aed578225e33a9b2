//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repository implementations only translate between Diesel rows and domain
//! types. Row structs (`models.rs`) and table definitions (`schema.rs`) stay
//! private to this module. Connections come from a `bb8` pool driven by
//! `diesel-async`.
//!
//! ```ignore
//! use foodgram::outbound::persistence::{DbPool, DieselRecipeRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/foodgram")).await?;
//! let recipes = DieselRecipeRepository::new(pool);
//! ```

pub(crate) mod diesel_basic_error_mapping;
mod diesel_catalogue_repository;
mod diesel_membership_repository;
mod diesel_recipe_repository;
mod diesel_short_link_repository;
mod diesel_subscription_repository;
mod diesel_user_repository;
mod migrations;
mod models;
pub(crate) mod pool;
mod read_models;
mod schema;

pub use diesel_catalogue_repository::DieselCatalogueRepository;
pub use diesel_membership_repository::DieselMembershipRepository;
pub use diesel_recipe_repository::DieselRecipeRepository;
pub use diesel_short_link_repository::DieselShortLinkRepository;
pub use diesel_subscription_repository::DieselSubscriptionRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
