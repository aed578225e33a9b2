//! User accounts: registration, profiles, avatar and password.
//!
//! ```text
//! POST   /api/users/                  {"email":..,"username":..,"first_name":..,"last_name":..,"password":..}
//! GET    /api/users/?page=1&limit=6
//! GET    /api/users/{id}/
//! GET    /api/users/me/
//! PUT    /api/users/me/avatar/        {"avatar":"data:image/png;base64,..."}
//! DELETE /api/users/me/avatar/
//! POST   /api/users/set_password/     {"new_password":..,"current_password":..}
//! ```

use actix_web::{HttpRequest, HttpResponse, delete, get, post, put, web};
use pagination::Page;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::cache_control::private_no_cache_header;
use super::dto::UserResponse;
use super::paging::{QueryParams, page_envelope};
use super::schemas::{ErrorSchema, UserPageSchema};
use super::session::SessionContext;
use super::state::HttpState;
use super::validation::{parse_image, user_validation_error};
use crate::domain::{ApiResult, Registration, User, UserId, UserValidationError};

/// Body of `POST /api/users/`.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct RegisterRequest {
    #[schema(example = "ada@example.com")]
    pub email: String,
    #[schema(example = "ada")]
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

impl TryFrom<RegisterRequest> for Registration {
    type Error = UserValidationError;

    fn try_from(value: RegisterRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(
            &value.email,
            &value.username,
            &value.first_name,
            &value.last_name,
            &value.password,
        )
    }
}

/// Account created by registration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct RegisteredUserResponse {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

impl From<User> for RegisteredUserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.get(),
            email: user.email.as_str().to_owned(),
            username: user.username.as_str().to_owned(),
            first_name: user.first_name,
            last_name: user.last_name,
        }
    }
}

/// Body of `PUT /api/users/me/avatar/`.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct AvatarRequest {
    #[schema(example = "data:image/png;base64,iVBORw0KGgo=")]
    pub avatar: String,
}

/// Public URL of the stored avatar.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct AvatarResponse {
    #[schema(example = "/media/users/3f2c.png")]
    pub avatar: String,
}

/// Body of `POST /api/users/set_password/`.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct SetPasswordRequest {
    pub new_password: String,
    pub current_password: String,
}

#[utoipa::path(
    post,
    path = "/api/users/",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Registered", body = RegisteredUserResponse),
        (status = 400, description = "Invalid field or duplicate email/username", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "registerUser",
    security([])
)]
#[post("/users/")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let registration =
        Registration::try_from(payload.into_inner()).map_err(user_validation_error)?;
    let user = state.accounts.register(registration).await?;
    Ok(HttpResponse::Created().json(RegisteredUserResponse::from(user)))
}

#[utoipa::path(
    get,
    path = "/api/users/",
    params(
        ("page" = Option<u64>, Query, description = "1-based page number"),
        ("limit" = Option<u32>, Query, description = "Page size")
    ),
    responses(
        (status = 200, description = "Page of users", body = UserPageSchema),
        (status = 404, description = "Invalid page", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "listUsers",
    security([])
)]
#[get("/users/")]
pub async fn list_users(
    req: HttpRequest,
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Page<UserResponse>>> {
    let viewer = session.user_id()?;
    let page = QueryParams::from_request(&req).page_request(state.presentation.page_size)?;
    let listing = state.users.list(viewer, page).await?;
    let body = page_envelope(&req, &page, listing, |card| {
        UserResponse::from_card(card, &state.presentation)
    })?;
    Ok(web::Json(body))
}

/// Profile of the signed-in caller.
#[utoipa::path(
    get,
    path = "/api/users/me/",
    responses(
        (status = 200, description = "Own profile", body = UserResponse),
        (status = 401, description = "Not signed in", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "currentUser"
)]
#[get("/users/me/")]
pub async fn current_user(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let user = session.require_user_id()?;
    let card = state.users.me(user).await?;
    Ok(HttpResponse::Ok()
        .insert_header(private_no_cache_header())
        .json(UserResponse::from_card(card, &state.presentation)))
}

#[utoipa::path(
    put,
    path = "/api/users/me/avatar/",
    request_body = AvatarRequest,
    responses(
        (status = 200, description = "Avatar stored", body = AvatarResponse),
        (status = 400, description = "Invalid image", body = ErrorSchema),
        (status = 401, description = "Not signed in", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "setAvatar"
)]
#[put("/users/me/avatar/")]
pub async fn set_avatar(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<AvatarRequest>,
) -> ApiResult<web::Json<AvatarResponse>> {
    let user = session.require_user_id()?;
    let raw = state.presentation.image_reference(&payload.avatar);
    let image = parse_image("avatar", raw)?;
    let path = state.accounts.set_avatar(user, image).await?;
    Ok(web::Json(AvatarResponse {
        avatar: state.presentation.image_url(&path),
    }))
}

#[utoipa::path(
    delete,
    path = "/api/users/me/avatar/",
    responses(
        (status = 204, description = "Avatar removed"),
        (status = 401, description = "Not signed in", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "clearAvatar"
)]
#[delete("/users/me/avatar/")]
pub async fn clear_avatar(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let user = session.require_user_id()?;
    state.accounts.clear_avatar(user).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[utoipa::path(
    post,
    path = "/api/users/set_password/",
    request_body = SetPasswordRequest,
    responses(
        (status = 204, description = "Password changed"),
        (status = 400, description = "Current password does not match", body = ErrorSchema),
        (status = 401, description = "Not signed in", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "setPassword"
)]
#[post("/users/set_password/")]
pub async fn set_password(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<SetPasswordRequest>,
) -> ApiResult<HttpResponse> {
    let user = session.require_user_id()?;
    let SetPasswordRequest {
        new_password,
        current_password,
    } = payload.into_inner();
    state
        .accounts
        .change_password(user, current_password, new_password)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Public profile of any user.
#[utoipa::path(
    get,
    path = "/api/users/{id}/",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "Profile", body = UserResponse),
        (status = 404, description = "Unknown user", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getUser",
    security([])
)]
#[get("/users/{id}/")]
pub async fn get_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<UserId>,
) -> ApiResult<web::Json<UserResponse>> {
    let viewer = session.user_id()?;
    let card = state.users.get(viewer, path.into_inner()).await?;
    Ok(web::Json(UserResponse::from_card(card, &state.presentation)))
}

#[cfg(test)]
#[path = "users_tests.rs"]
mod tests;
