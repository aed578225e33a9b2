//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! specification for the REST API. It registers:
//!
//! - **Paths**: every HTTP endpoint from the inbound layer, including the
//!   short-link redirect and health probes
//! - **Schemas**: response DTOs plus wrappers ([`ErrorSchema`],
//!   [`ErrorCodeSchema`], the page envelopes) that describe types which do
//!   not derive `ToSchema` themselves
//! - **Security**: Session cookie authentication scheme
//!
//! The generated specification is served by Swagger UI in debug builds.

use crate::inbound::http::auth::LoginRequest;
use crate::inbound::http::dto::{
    AuthorResponse, IngredientResponse, RecipeIngredientResponse, RecipeResponse,
    RecipeSummaryResponse, TagResponse, UserResponse,
};
use crate::inbound::http::recipes::{
    CreateRecipeRequest, PortionRequest, ShortLinkResponse, UpdateRecipeRequest,
};
use crate::inbound::http::schemas::{
    AuthorPageSchema, ErrorCodeSchema, ErrorSchema, RecipePageSchema, UserPageSchema,
};
use crate::inbound::http::users::{
    AvatarRequest, AvatarResponse, RegisterRequest, RegisteredUserResponse, SetPasswordRequest,
};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/auth/login/.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Foodgram backend API",
        description = "Recipes, tags, ingredients, favorites, shopping carts and subscriptions.",
        license(
            name = "Apache-2.0",
            url = "https://www.apache.org/licenses/LICENSE-2.0.html"
        )
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::users::register,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::current_user,
        crate::inbound::http::users::set_avatar,
        crate::inbound::http::users::clear_avatar,
        crate::inbound::http::users::set_password,
        crate::inbound::http::users::get_user,
        crate::inbound::http::subscriptions::list_subscriptions,
        crate::inbound::http::subscriptions::subscribe,
        crate::inbound::http::subscriptions::unsubscribe,
        crate::inbound::http::catalogue::list_tags,
        crate::inbound::http::catalogue::get_tag,
        crate::inbound::http::catalogue::list_ingredients,
        crate::inbound::http::catalogue::get_ingredient,
        crate::inbound::http::recipes::list_recipes,
        crate::inbound::http::recipes::create_recipe,
        crate::inbound::http::recipes::get_recipe,
        crate::inbound::http::recipes::update_recipe,
        crate::inbound::http::recipes::delete_recipe,
        crate::inbound::http::recipes::get_link,
        crate::inbound::http::memberships::add_favorite,
        crate::inbound::http::memberships::remove_favorite,
        crate::inbound::http::memberships::add_to_cart,
        crate::inbound::http::memberships::remove_from_cart,
        crate::inbound::http::memberships::download_shopping_cart,
        crate::inbound::http::short_links::redirect,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        LoginRequest,
        RegisterRequest,
        RegisteredUserResponse,
        AvatarRequest,
        AvatarResponse,
        SetPasswordRequest,
        UserResponse,
        UserPageSchema,
        AuthorResponse,
        AuthorPageSchema,
        TagResponse,
        IngredientResponse,
        PortionRequest,
        CreateRecipeRequest,
        UpdateRecipeRequest,
        RecipeIngredientResponse,
        RecipeResponse,
        RecipeSummaryResponse,
        RecipePageSchema,
        ShortLinkResponse,
    )),
    tags(
        (name = "auth", description = "Session login and logout"),
        (name = "users", description = "Accounts and profiles"),
        (name = "subscriptions", description = "Following authors"),
        (name = "catalogue", description = "Read-only tags and ingredients"),
        (name = "recipes", description = "Recipe authoring and browsing"),
        (name = "memberships", description = "Favorites and the shopping cart"),
        (name = "short links", description = "Short recipe links"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
