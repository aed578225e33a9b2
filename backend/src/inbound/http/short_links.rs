//! Short-link redirect surface, mounted outside `/api`.
//!
//! ```text
//! GET /s/{hash}/  ->  302 Location: <original url>
//! ```

use actix_web::{HttpResponse, get, http::header, web};

use super::schemas::ErrorSchema;
use super::state::HttpState;
use crate::domain::ApiResult;

#[utoipa::path(
    get,
    path = "/s/{hash}/",
    params(("hash" = String, Path, description = "Short-link hash")),
    responses(
        (status = 302, description = "Redirect to the original URL", headers(("Location" = String))),
        (status = 404, description = "Unknown hash", body = ErrorSchema)
    ),
    tags = ["short links"],
    operation_id = "followShortLink",
    security([])
)]
#[get("/s/{hash}/")]
pub async fn redirect(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let target = state.short_links.resolve(path.into_inner()).await?;
    Ok(HttpResponse::Found()
        .insert_header((header::LOCATION, target.as_str()))
        .finish())
}
