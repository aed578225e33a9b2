//! Builders wiring Diesel repositories and domain services into HTTP state.

use std::sync::Arc;

use actix_web::web;

use foodgram::domain::ports::{
    AccountsCommand, CatalogueQuery, MembershipCommand, RecipesCommand, RecipesQuery,
    ShoppingListQuery, ShortLinkCommand, SubscriptionsCommand, UsersQuery,
};
use foodgram::domain::{
    AccountsService, CatalogueService, MembershipService, RandomShortHashGenerator,
    RecipeService, ShoppingListService, ShortLinkService, SubscriptionService,
};
use foodgram::inbound::http::state::{HttpState, HttpStatePorts};
use foodgram::outbound::media::FsImageStore;
use foodgram::outbound::password::Argon2PasswordHasher;
use foodgram::outbound::persistence::{
    DieselCatalogueRepository, DieselMembershipRepository, DieselRecipeRepository,
    DieselShortLinkRepository, DieselSubscriptionRepository, DieselUserRepository,
};

use super::ServerConfig;

/// Compose the domain services over Diesel repositories and the media store.
///
/// Repositories shared by several services (users, recipes, memberships)
/// are constructed once and handed out as clones of the same `Arc`.
///
/// # Errors
///
/// Returns [`std::io::Error`] when the media root cannot be created or
/// opened.
fn build_ports(config: &ServerConfig) -> std::io::Result<HttpStatePorts> {
    let pool = &config.db_pool;
    let users = Arc::new(DieselUserRepository::new(pool.clone()));
    let catalogue = Arc::new(DieselCatalogueRepository::new(pool.clone()));
    let recipes = Arc::new(DieselRecipeRepository::new(pool.clone()));
    let memberships = Arc::new(DieselMembershipRepository::new(pool.clone()));
    let images = Arc::new(FsImageStore::open(&config.media_root)?);

    let accounts = Arc::new(AccountsService::new(
        users.clone(),
        Arc::new(Argon2PasswordHasher),
        images.clone(),
    ));
    let recipe_service = Arc::new(RecipeService::new(
        recipes.clone(),
        catalogue.clone(),
        users.clone(),
        images,
        config.recipe_limits,
    ));
    let short_links = ShortLinkService::new(
        Arc::new(DieselShortLinkRepository::new(pool.clone())),
        Arc::new(RandomShortHashGenerator::new(config.hash_length.clone())),
        config.short_link_attempts,
    );
    let subscriptions = SubscriptionService::new(
        Arc::new(DieselSubscriptionRepository::new(pool.clone())),
        users,
    );

    Ok(HttpStatePorts {
        accounts: accounts.clone() as Arc<dyn AccountsCommand>,
        users: accounts as Arc<dyn UsersQuery>,
        catalogue: Arc::new(CatalogueService::new(catalogue)) as Arc<dyn CatalogueQuery>,
        recipes: recipe_service.clone() as Arc<dyn RecipesCommand>,
        recipes_query: recipe_service as Arc<dyn RecipesQuery>,
        memberships: Arc::new(MembershipService::new(memberships.clone(), recipes))
            as Arc<dyn MembershipCommand>,
        shopping_list: Arc::new(ShoppingListService::new(memberships))
            as Arc<dyn ShoppingListQuery>,
        short_links: Arc::new(short_links) as Arc<dyn ShortLinkCommand>,
        subscriptions: Arc::new(subscriptions) as Arc<dyn SubscriptionsCommand>,
    })
}

/// Build the shared HTTP state from the configured pool and media root.
///
/// # Errors
///
/// Propagates media root failures from [`FsImageStore::open`].
pub(super) fn build_http_state(config: &ServerConfig) -> std::io::Result<web::Data<HttpState>> {
    let ports = build_ports(config)?;
    Ok(web::Data::new(HttpState::new(
        ports,
        config.presentation.clone(),
    )))
}
