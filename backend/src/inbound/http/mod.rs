//! HTTP inbound adapter exposing REST endpoints.

use actix_web::web;

pub mod auth;
pub mod cache_control;
pub mod catalogue;
pub mod dto;
pub mod error;
pub mod health;
pub mod memberships;
mod paging;
pub mod recipes;
pub mod schemas;
pub mod session;
pub mod session_key;
pub mod short_links;
pub mod state;
pub mod subscriptions;
#[cfg(test)]
pub mod test_utils;
pub mod users;
mod validation;

pub use crate::domain::ApiResult;

/// Register every `/api` route.
///
/// Literal segments (`me`, `subscriptions`, `set_password`,
/// `download_shopping_cart`) are registered before the `{id}` routes that
/// would otherwise capture them.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(auth::login)
        .service(auth::logout)
        .service(users::register)
        .service(users::list_users)
        .service(users::current_user)
        .service(users::set_avatar)
        .service(users::clear_avatar)
        .service(users::set_password)
        .service(subscriptions::list_subscriptions)
        .service(subscriptions::subscribe)
        .service(subscriptions::unsubscribe)
        .service(users::get_user)
        .service(catalogue::list_tags)
        .service(catalogue::get_tag)
        .service(catalogue::list_ingredients)
        .service(catalogue::get_ingredient)
        .service(memberships::download_shopping_cart)
        .service(recipes::list_recipes)
        .service(recipes::create_recipe)
        .service(recipes::get_recipe)
        .service(recipes::update_recipe)
        .service(recipes::delete_recipe)
        .service(recipes::get_link)
        .service(memberships::add_favorite)
        .service(memberships::remove_favorite)
        .service(memberships::add_to_cart)
        .service(memberships::remove_from_cart);
}

/// Route extractor failures through the domain error envelope.
pub fn configure_extractors(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(error::query_error_handler))
        .app_data(web::PathConfig::default().error_handler(error::path_error_handler));
}
