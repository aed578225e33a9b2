//! Tag and ingredient reference data.
//!
//! ```text
//! GET /api/tags/
//! GET /api/tags/{id}/
//! GET /api/ingredients/?name=to
//! GET /api/ingredients/{id}/
//! ```

use actix_web::{get, web};
use serde::Deserialize;
use utoipa::IntoParams;

use super::dto::{IngredientResponse, TagResponse};
use super::schemas::ErrorSchema;
use super::state::HttpState;
use crate::domain::{ApiResult, IngredientId, TagId};

/// Query parameters for `GET /api/ingredients/`.
#[derive(Debug, Deserialize, IntoParams)]
pub struct IngredientQuery {
    /// Case-sensitive name prefix.
    pub name: Option<String>,
}

/// List every tag; tags are not paginated.
#[utoipa::path(
    get,
    path = "/api/tags/",
    responses((status = 200, description = "All tags", body = [TagResponse])),
    tags = ["catalogue"],
    operation_id = "listTags",
    security([])
)]
#[get("/tags/")]
pub async fn list_tags(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<TagResponse>>> {
    let tags = state.catalogue.tags().await?;
    Ok(web::Json(tags.into_iter().map(TagResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/tags/{id}/",
    params(("id" = i64, Path, description = "Tag id")),
    responses(
        (status = 200, description = "Tag", body = TagResponse),
        (status = 404, description = "Unknown tag", body = ErrorSchema)
    ),
    tags = ["catalogue"],
    operation_id = "getTag",
    security([])
)]
#[get("/tags/{id}/")]
pub async fn get_tag(
    state: web::Data<HttpState>,
    path: web::Path<TagId>,
) -> ApiResult<web::Json<TagResponse>> {
    let tag = state.catalogue.tag(path.into_inner()).await?;
    Ok(web::Json(tag.into()))
}

/// List ingredients, optionally filtered by name prefix.
#[utoipa::path(
    get,
    path = "/api/ingredients/",
    params(IngredientQuery),
    responses((status = 200, description = "Ingredients ordered by name", body = [IngredientResponse])),
    tags = ["catalogue"],
    operation_id = "listIngredients",
    security([])
)]
#[get("/ingredients/")]
pub async fn list_ingredients(
    state: web::Data<HttpState>,
    query: web::Query<IngredientQuery>,
) -> ApiResult<web::Json<Vec<IngredientResponse>>> {
    let ingredients = state.catalogue.ingredients(query.into_inner().name).await?;
    Ok(web::Json(
        ingredients
            .into_iter()
            .map(IngredientResponse::from)
            .collect(),
    ))
}

#[utoipa::path(
    get,
    path = "/api/ingredients/{id}/",
    params(("id" = i64, Path, description = "Ingredient id")),
    responses(
        (status = 200, description = "Ingredient", body = IngredientResponse),
        (status = 404, description = "Unknown ingredient", body = ErrorSchema)
    ),
    tags = ["catalogue"],
    operation_id = "getIngredient",
    security([])
)]
#[get("/ingredients/{id}/")]
pub async fn get_ingredient(
    state: web::Data<HttpState>,
    path: web::Path<IngredientId>,
) -> ApiResult<web::Json<IngredientResponse>> {
    let ingredient = state.catalogue.ingredient(path.into_inner()).await?;
    Ok(web::Json(ingredient.into()))
}
