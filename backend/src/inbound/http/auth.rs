//! Session login and logout.
//!
//! ```text
//! POST /api/auth/login/  {"email":"ada@example.com","password":"..."}
//! POST /api/auth/logout/
//! ```

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::schemas::ErrorSchema;
use super::session::SessionContext;
use super::state::HttpState;
use super::validation::user_validation_error;
use crate::domain::{ApiResult, LoginCredentials, UserValidationError};

/// Login request body for `POST /api/auth/login/`.
#[derive(Deserialize, Serialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "ada@example.com")]
    pub email: String,
    pub password: String,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = UserValidationError;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.email, &value.password)
    }
}

/// Check credentials and establish a session.
#[utoipa::path(
    post,
    path = "/api/auth/login/",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Malformed credentials", body = ErrorSchema),
        (status = 401, description = "Wrong email or password", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login/")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let credentials =
        LoginCredentials::try_from(payload.into_inner()).map_err(user_validation_error)?;
    let user_id = state.accounts.login(credentials).await?;
    session.persist_user(user_id)?;
    Ok(HttpResponse::Ok().finish())
}

/// End the caller's session.
#[utoipa::path(
    post,
    path = "/api/auth/logout/",
    responses(
        (status = 204, description = "Signed out"),
        (status = 401, description = "Not signed in", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "logout"
)]
#[post("/auth/logout/")]
pub async fn logout(session: SessionContext) -> ApiResult<HttpResponse> {
    session.require_user_id()?;
    session.purge();
    Ok(HttpResponse::NoContent().finish())
}
