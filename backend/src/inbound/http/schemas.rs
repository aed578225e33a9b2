//! OpenAPI schema definitions for domain and envelope types.
//!
//! Domain types remain framework-agnostic by not deriving `ToSchema`, and
//! the generic `pagination::Page` envelope lives in a crate without utoipa.
//! The wrappers below mirror their serialized shape so the OpenAPI document
//! can describe them.

use utoipa::ToSchema;

use super::dto::{AuthorResponse, RecipeResponse, UserResponse};

/// OpenAPI schema for [`crate::domain::ErrorCode`].
///
/// Stable machine-readable error codes returned in API error responses.
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// Authentication failed or is missing.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// Authenticated but not permitted to perform this action.
    #[schema(rename = "forbidden")]
    Forbidden,
    /// The requested resource does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// The relation being added already exists.
    #[schema(rename = "conflict")]
    Conflict,
    /// The database or image store is unavailable.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "conflict")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "Recipe \"Tomato soup\" is already in favorites.")]
    message: String,
    /// Correlation identifier, echoed in the `trace-id` header.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Field-level context such as `{"field": "ingredients", "ids": [9999]}`.
    details: Option<serde_json::Value>,
}

/// Page of recipes.
#[derive(ToSchema)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct RecipePageSchema {
    count: u64,
    /// Absolute URL of the next page.
    next: Option<String>,
    /// Absolute URL of the previous page.
    previous: Option<String>,
    results: Vec<RecipeResponse>,
}

/// Page of users.
#[derive(ToSchema)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct UserPageSchema {
    count: u64,
    next: Option<String>,
    previous: Option<String>,
    results: Vec<UserResponse>,
}

/// Page of followed authors.
#[derive(ToSchema)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct AuthorPageSchema {
    count: u64,
    next: Option<String>,
    previous: Option<String>,
    results: Vec<AuthorResponse>,
}
