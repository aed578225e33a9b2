//! Favorites, shopping cart and the shopping-list export.
//!
//! ```text
//! POST   /api/recipes/{id}/favorite/
//! DELETE /api/recipes/{id}/favorite/
//! POST   /api/recipes/{id}/shopping_cart/
//! DELETE /api/recipes/{id}/shopping_cart/
//! GET    /api/recipes/download_shopping_cart/
//! ```
//!
//! Both collections go through the same [`MembershipCommand`] port; the
//! handlers differ only in the [`MembershipKind`] they pass.
//!
//! [`MembershipCommand`]: crate::domain::ports::MembershipCommand

use actix_web::{HttpResponse, delete, get, http::header, post, web};

use super::cache_control::private_no_cache_header;
use super::dto::RecipeSummaryResponse;
use super::schemas::ErrorSchema;
use super::session::SessionContext;
use super::state::HttpState;
use crate::domain::{ApiResult, MembershipKind, RecipeId};

/// File name offered for the shopping-list download.
pub const SHOPPING_LIST_FILENAME: &str = "shopping_list.txt";

async fn add(
    state: &HttpState,
    session: &SessionContext,
    kind: MembershipKind,
    recipe: RecipeId,
) -> ApiResult<HttpResponse> {
    let user = session.require_user_id()?;
    let summary = state.memberships.add(kind, user, recipe).await?;
    Ok(HttpResponse::Created().json(RecipeSummaryResponse::from_summary(
        summary,
        &state.presentation,
    )))
}

async fn remove(
    state: &HttpState,
    session: &SessionContext,
    kind: MembershipKind,
    recipe: RecipeId,
) -> ApiResult<HttpResponse> {
    let user = session.require_user_id()?;
    state.memberships.remove(kind, user, recipe).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[utoipa::path(
    post,
    path = "/api/recipes/{id}/favorite/",
    params(("id" = i64, Path, description = "Recipe id")),
    responses(
        (status = 201, description = "Added to favorites", body = RecipeSummaryResponse),
        (status = 401, description = "Not signed in", body = ErrorSchema),
        (status = 404, description = "Unknown recipe", body = ErrorSchema),
        (status = 409, description = "Already a favorite", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "addFavorite"
)]
#[post("/recipes/{id}/favorite/")]
pub async fn add_favorite(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<RecipeId>,
) -> ApiResult<HttpResponse> {
    add(&state, &session, MembershipKind::Favorite, path.into_inner()).await
}

#[utoipa::path(
    delete,
    path = "/api/recipes/{id}/favorite/",
    params(("id" = i64, Path, description = "Recipe id")),
    responses(
        (status = 204, description = "Removed from favorites"),
        (status = 401, description = "Not signed in", body = ErrorSchema),
        (status = 404, description = "Unknown recipe or not a favorite", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "removeFavorite"
)]
#[delete("/recipes/{id}/favorite/")]
pub async fn remove_favorite(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<RecipeId>,
) -> ApiResult<HttpResponse> {
    remove(&state, &session, MembershipKind::Favorite, path.into_inner()).await
}

#[utoipa::path(
    post,
    path = "/api/recipes/{id}/shopping_cart/",
    params(("id" = i64, Path, description = "Recipe id")),
    responses(
        (status = 201, description = "Added to the shopping cart", body = RecipeSummaryResponse),
        (status = 401, description = "Not signed in", body = ErrorSchema),
        (status = 404, description = "Unknown recipe", body = ErrorSchema),
        (status = 409, description = "Already in the cart", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "addToShoppingCart"
)]
#[post("/recipes/{id}/shopping_cart/")]
pub async fn add_to_cart(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<RecipeId>,
) -> ApiResult<HttpResponse> {
    add(&state, &session, MembershipKind::ShoppingCart, path.into_inner()).await
}

#[utoipa::path(
    delete,
    path = "/api/recipes/{id}/shopping_cart/",
    params(("id" = i64, Path, description = "Recipe id")),
    responses(
        (status = 204, description = "Removed from the shopping cart"),
        (status = 401, description = "Not signed in", body = ErrorSchema),
        (status = 404, description = "Unknown recipe or not in the cart", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "removeFromShoppingCart"
)]
#[delete("/recipes/{id}/shopping_cart/")]
pub async fn remove_from_cart(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<RecipeId>,
) -> ApiResult<HttpResponse> {
    remove(&state, &session, MembershipKind::ShoppingCart, path.into_inner()).await
}

/// Download the consolidated shopping list as plain text.
///
/// One `<name> - <amount> (<unit>)` line per ingredient across every recipe
/// in the caller's cart.
#[utoipa::path(
    get,
    path = "/api/recipes/download_shopping_cart/",
    responses(
        (status = 200, description = "Shopping list", body = String, content_type = "text/plain"),
        (status = 401, description = "Not signed in", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "downloadShoppingCart"
)]
#[get("/recipes/download_shopping_cart/")]
pub async fn download_shopping_cart(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let user = session.require_user_id()?;
    let list = state.shopping_list.shopping_list(user).await?;
    Ok(HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .insert_header(private_no_cache_header())
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{SHOPPING_LIST_FILENAME}\""),
        ))
        .body(list.render()))
}
