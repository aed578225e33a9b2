//! Recipe endpoints.
//!
//! ```text
//! GET    /api/recipes/?tags=lunch&author=3&is_favorited=1&page=2&limit=6
//! POST   /api/recipes/
//! GET    /api/recipes/{id}/
//! PATCH  /api/recipes/{id}/
//! DELETE /api/recipes/{id}/
//! GET    /api/recipes/{id}/get-link/
//! ```
//!
//! Reads are open to anonymous callers; the viewer flags
//! (`is_favorited`, `is_in_shopping_cart`) are computed for signed-in
//! callers and always false otherwise.

use actix_web::{HttpRequest, HttpResponse, delete, get, http::header, patch, post, web};
use pagination::Page;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::dto::RecipeResponse;
use super::paging::{QueryParams, absolute_url, page_envelope};
use super::schemas::{ErrorSchema, RecipePageSchema};
use super::session::SessionContext;
use super::state::{HttpState, Presentation};
use super::validation::{FieldCode, field_error, parse_flag, parse_id, parse_image};
use crate::domain::{
    ApiResult, Error, ImageInput, IngredientId, PortionInput, RecipeFilter, RecipeId, RecipeInput,
    RecipePatch, TagId, TagSlug,
};

/// Ingredient line of a recipe write request.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct PortionRequest {
    /// Ingredient id.
    #[schema(example = 4)]
    pub id: i64,
    #[schema(example = 200)]
    pub amount: i64,
}

impl From<PortionRequest> for PortionInput {
    fn from(value: PortionRequest) -> Self {
        Self {
            ingredient_id: IngredientId::new(value.id),
            amount: value.amount,
        }
    }
}

/// Body of `POST /api/recipes/`.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct CreateRecipeRequest {
    pub ingredients: Vec<PortionRequest>,
    pub tags: Vec<i64>,
    /// `data:image/<ext>;base64,<payload>`.
    #[schema(example = "data:image/png;base64,iVBORw0KGgo=")]
    pub image: Option<String>,
    pub name: String,
    pub text: String,
    /// Minutes.
    pub cooking_time: i64,
}

/// Body of `PATCH /api/recipes/{id}/`.
///
/// Omitted scalar fields keep their stored value; `tags` and `ingredients`
/// must always be sent.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct UpdateRecipeRequest {
    pub ingredients: Option<Vec<PortionRequest>>,
    pub tags: Option<Vec<i64>>,
    pub image: Option<String>,
    pub name: Option<String>,
    pub text: Option<String>,
    pub cooking_time: Option<i64>,
}

/// Body of `GET /api/recipes/{id}/get-link/`.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct ShortLinkResponse {
    #[serde(rename = "short-link")]
    #[schema(example = "https://foodgram.example/s/aZ3kP0q/")]
    pub short_link: String,
}

fn tag_ids(raw: Vec<i64>) -> Vec<TagId> {
    raw.into_iter().map(TagId::new).collect()
}

fn portions(raw: Vec<PortionRequest>) -> Vec<PortionInput> {
    raw.into_iter().map(PortionInput::from).collect()
}

fn image_input(presentation: &Presentation, raw: Option<&str>) -> Result<Option<ImageInput>, Error> {
    raw.map(|raw| parse_image("image", presentation.image_reference(raw)))
        .transpose()
}

fn recipe_input(
    presentation: &Presentation,
    body: CreateRecipeRequest,
) -> Result<RecipeInput, Error> {
    Ok(RecipeInput {
        image: image_input(presentation, body.image.as_deref())?,
        name: body.name,
        text: body.text,
        cooking_time: body.cooking_time,
        tags: tag_ids(body.tags),
        ingredients: portions(body.ingredients),
    })
}

fn recipe_patch(
    presentation: &Presentation,
    body: UpdateRecipeRequest,
) -> Result<RecipePatch, Error> {
    Ok(RecipePatch {
        image: image_input(presentation, body.image.as_deref())?,
        name: body.name,
        text: body.text,
        cooking_time: body.cooking_time,
        tags: body.tags.map(tag_ids),
        ingredients: body.ingredients.map(portions),
    })
}

pub(crate) fn recipe_filter(params: &QueryParams) -> Result<RecipeFilter, Error> {
    let tags = params
        .all("tags")
        .map(|raw| {
            TagSlug::new(raw).map_err(|err| field_error("tags", FieldCode::Invalid, err.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(RecipeFilter {
        tags,
        author: params
            .first("author")
            .map(|raw| parse_id("author", raw))
            .transpose()?,
        is_favorited: params
            .first("is_favorited")
            .map(|raw| parse_flag("is_favorited", raw))
            .transpose()?,
        is_in_shopping_cart: params
            .first("is_in_shopping_cart")
            .map(|raw| parse_flag("is_in_shopping_cart", raw))
            .transpose()?,
    })
}

/// List recipes newest first.
#[utoipa::path(
    get,
    path = "/api/recipes/",
    params(
        ("page" = Option<u64>, Query, description = "1-based page number"),
        ("limit" = Option<u32>, Query, description = "Page size"),
        ("tags" = Option<Vec<String>>, Query, description = "Tag slugs; any match"),
        ("author" = Option<i64>, Query, description = "Author id"),
        ("is_favorited" = Option<String>, Query, description = "1/true or 0/false"),
        ("is_in_shopping_cart" = Option<String>, Query, description = "1/true or 0/false")
    ),
    responses(
        (status = 200, description = "Page of recipes", body = RecipePageSchema),
        (status = 400, description = "Malformed filter", body = ErrorSchema),
        (status = 404, description = "Invalid page", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "listRecipes",
    security([])
)]
#[get("/recipes/")]
pub async fn list_recipes(
    req: HttpRequest,
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Page<RecipeResponse>>> {
    let viewer = session.user_id()?;
    let params = QueryParams::from_request(&req);
    let page = params.page_request(state.presentation.page_size)?;
    let filter = recipe_filter(&params)?;
    let listing = state.recipes_query.list(viewer, filter, page).await?;
    let body = page_envelope(&req, &page, listing, |view| {
        RecipeResponse::from_view(view, &state.presentation)
    })?;
    Ok(web::Json(body))
}

/// Publish a recipe authored by the caller.
#[utoipa::path(
    post,
    path = "/api/recipes/",
    request_body = CreateRecipeRequest,
    responses(
        (status = 201, description = "Created recipe", body = RecipeResponse),
        (status = 400, description = "Invalid composition", body = ErrorSchema),
        (status = 401, description = "Not signed in", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "createRecipe"
)]
#[post("/recipes/")]
pub async fn create_recipe(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateRecipeRequest>,
) -> ApiResult<HttpResponse> {
    let author = session.require_user_id()?;
    let input = recipe_input(&state.presentation, payload.into_inner())?;
    let view = state.recipes.create(author, input).await?;
    Ok(HttpResponse::Created().json(RecipeResponse::from_view(view, &state.presentation)))
}

#[utoipa::path(
    get,
    path = "/api/recipes/{id}/",
    params(("id" = i64, Path, description = "Recipe id")),
    responses(
        (status = 200, description = "Recipe", body = RecipeResponse),
        (status = 404, description = "Unknown recipe", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "getRecipe",
    security([])
)]
#[get("/recipes/{id}/")]
pub async fn get_recipe(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<RecipeId>,
) -> ApiResult<web::Json<RecipeResponse>> {
    let viewer = session.user_id()?;
    let view = state.recipes_query.get(viewer, path.into_inner()).await?;
    Ok(web::Json(RecipeResponse::from_view(view, &state.presentation)))
}

/// Edit a recipe; only its author or an admin may do so.
#[utoipa::path(
    patch,
    path = "/api/recipes/{id}/",
    params(("id" = i64, Path, description = "Recipe id")),
    request_body = UpdateRecipeRequest,
    responses(
        (status = 200, description = "Updated recipe", body = RecipeResponse),
        (status = 400, description = "Invalid composition or missing tags/ingredients", body = ErrorSchema),
        (status = 401, description = "Not signed in", body = ErrorSchema),
        (status = 403, description = "Not the author", body = ErrorSchema),
        (status = 404, description = "Unknown recipe", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "updateRecipe"
)]
#[patch("/recipes/{id}/")]
pub async fn update_recipe(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<RecipeId>,
    payload: web::Json<UpdateRecipeRequest>,
) -> ApiResult<web::Json<RecipeResponse>> {
    let actor = session.require_user_id()?;
    let patch = recipe_patch(&state.presentation, payload.into_inner())?;
    let view = state
        .recipes
        .update(actor, path.into_inner(), patch)
        .await?;
    Ok(web::Json(RecipeResponse::from_view(view, &state.presentation)))
}

#[utoipa::path(
    delete,
    path = "/api/recipes/{id}/",
    params(("id" = i64, Path, description = "Recipe id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 401, description = "Not signed in", body = ErrorSchema),
        (status = 403, description = "Not the author", body = ErrorSchema),
        (status = 404, description = "Unknown recipe", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "deleteRecipe"
)]
#[delete("/recipes/{id}/")]
pub async fn delete_recipe(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<RecipeId>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_user_id()?;
    state.recipes.delete(actor, path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Short link to a recipe.
///
/// The link targets the page the caller came from (`Referer`) or, failing
/// that, the recipe's API URL. Repeated calls for the same target return
/// the same link.
#[utoipa::path(
    get,
    path = "/api/recipes/{id}/get-link/",
    params(("id" = i64, Path, description = "Recipe id")),
    responses(
        (status = 200, description = "Short link", body = ShortLinkResponse),
        (status = 404, description = "Unknown recipe", body = ErrorSchema),
        (status = 503, description = "No free hash could be generated", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "getRecipeLink",
    security([])
)]
#[get("/recipes/{id}/get-link/")]
pub async fn get_link(
    req: HttpRequest,
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<RecipeId>,
) -> ApiResult<web::Json<ShortLinkResponse>> {
    let id = path.into_inner();
    state.recipes_query.get(session.user_id()?, id).await?;
    let target = req
        .headers()
        .get(header::REFERER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
        .unwrap_or_else(|| absolute_url(&req, &format!("/api/recipes/{id}/")));
    let link = state.short_links.get_or_create(target).await?;
    Ok(web::Json(ShortLinkResponse {
        short_link: absolute_url(&req, &format!("/s/{}/", link.url_hash)),
    }))
}

#[cfg(test)]
#[path = "recipes_tests.rs"]
mod tests;
