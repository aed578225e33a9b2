//! Following other authors.
//!
//! ```text
//! GET    /api/users/subscriptions/?page=1&limit=6&recipes_limit=3
//! POST   /api/users/{id}/subscribe/?recipes_limit=3
//! DELETE /api/users/{id}/subscribe/
//! ```

use std::num::NonZeroU32;

use actix_web::{HttpRequest, HttpResponse, delete, get, post, web};
use pagination::{Page, limit_or_default};

use super::dto::AuthorResponse;
use super::paging::{QueryParams, page_envelope};
use super::schemas::{AuthorPageSchema, ErrorSchema};
use super::session::SessionContext;
use super::state::HttpState;
use crate::domain::{ApiResult, UserId};

const RECIPES_LIMIT_PARAM: &str = "recipes_limit";

fn recipes_limit(params: &QueryParams, default: NonZeroU32) -> NonZeroU32 {
    limit_or_default(params.first(RECIPES_LIMIT_PARAM), default)
}

/// Authors the caller follows, each with their newest recipes.
#[utoipa::path(
    get,
    path = "/api/users/subscriptions/",
    params(
        ("page" = Option<u64>, Query, description = "1-based page number"),
        ("limit" = Option<u32>, Query, description = "Page size"),
        ("recipes_limit" = Option<u32>, Query, description = "Recipes embedded per author")
    ),
    responses(
        (status = 200, description = "Page of followed authors", body = AuthorPageSchema),
        (status = 401, description = "Not signed in", body = ErrorSchema),
        (status = 404, description = "Invalid page", body = ErrorSchema)
    ),
    tags = ["subscriptions"],
    operation_id = "listSubscriptions"
)]
#[get("/users/subscriptions/")]
pub async fn list_subscriptions(
    req: HttpRequest,
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Page<AuthorResponse>>> {
    let user = session.require_user_id()?;
    let params = QueryParams::from_request(&req);
    let page = params.page_request(state.presentation.page_size)?;
    let limit = recipes_limit(&params, state.presentation.recipes_limit);
    let listing = state.subscriptions.subscriptions(user, page, limit).await?;
    let body = page_envelope(&req, &page, listing, |card| {
        AuthorResponse::from_card(card, &state.presentation)
    })?;
    Ok(web::Json(body))
}

/// Follow an author.
#[utoipa::path(
    post,
    path = "/api/users/{id}/subscribe/",
    params(
        ("id" = i64, Path, description = "Author id"),
        ("recipes_limit" = Option<u32>, Query, description = "Recipes embedded in the response")
    ),
    responses(
        (status = 201, description = "Subscribed", body = AuthorResponse),
        (status = 400, description = "Self-subscription", body = ErrorSchema),
        (status = 401, description = "Not signed in", body = ErrorSchema),
        (status = 404, description = "Unknown author", body = ErrorSchema),
        (status = 409, description = "Already subscribed", body = ErrorSchema)
    ),
    tags = ["subscriptions"],
    operation_id = "subscribe"
)]
#[post("/users/{id}/subscribe/")]
pub async fn subscribe(
    req: HttpRequest,
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<UserId>,
) -> ApiResult<HttpResponse> {
    let user = session.require_user_id()?;
    let limit = recipes_limit(
        &QueryParams::from_request(&req),
        state.presentation.recipes_limit,
    );
    let card = state
        .subscriptions
        .subscribe(user, path.into_inner(), limit)
        .await?;
    Ok(HttpResponse::Created().json(AuthorResponse::from_card(card, &state.presentation)))
}

/// Stop following an author.
#[utoipa::path(
    delete,
    path = "/api/users/{id}/subscribe/",
    params(("id" = i64, Path, description = "Author id")),
    responses(
        (status = 204, description = "Unsubscribed"),
        (status = 401, description = "Not signed in", body = ErrorSchema),
        (status = 404, description = "Unknown author or not subscribed", body = ErrorSchema)
    ),
    tags = ["subscriptions"],
    operation_id = "unsubscribe"
)]
#[delete("/users/{id}/subscribe/")]
pub async fn unsubscribe(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<UserId>,
) -> ApiResult<HttpResponse> {
    let user = session.require_user_id()?;
    state
        .subscriptions
        .unsubscribe(user, path.into_inner())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
