//! End-to-end HTTP flows over the real domain services.
//!
//! Requests go through the production route table and session middleware;
//! only the driven ports are replaced by the in-memory store.

#[path = "support/in_memory.rs"]
mod in_memory;

use actix_http::Request;
use actix_session::SessionMiddleware;
use actix_session::config::CookieContentSecurity;
use actix_session::storage::CookieSessionStore;
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::{StatusCode, header};
use actix_web::{App, test as actix_test, web};
use foodgram::inbound::http::short_links::redirect;
use foodgram::inbound::http::{configure_api, configure_extractors};
use in_memory::{InMemoryStore, http_state, ingredient, tag};
use rstest::{fixture, rstest};
use serde_json::{Value, json};

#[fixture]
fn store() -> InMemoryStore {
    InMemoryStore::with_catalogue(
        vec![tag(1, "Breakfast"), tag(2, "Dinner")],
        vec![
            ingredient(10, "Salt", "g"),
            ingredient(11, "Flour", "g"),
            ingredient(12, "Milk", "ml"),
        ],
    )
}

macro_rules! app {
    ($store:expr) => {
        actix_test::init_service(
            App::new()
                .app_data(web::Data::new(http_state(&$store)))
                .configure(configure_extractors)
                .service(
                    web::scope("/api")
                        .wrap(
                            SessionMiddleware::builder(
                                CookieSessionStore::default(),
                                Key::generate(),
                            )
                            .cookie_name("session".into())
                            .cookie_secure(false)
                            .cookie_content_security(CookieContentSecurity::Private)
                            .build(),
                        )
                        .configure(configure_api),
                )
                .service(redirect),
        )
        .await
    };
}

async fn call(
    app: &impl Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
    request: actix_test::TestRequest,
) -> (StatusCode, Value) {
    let response = actix_test::call_service(app, request.to_request()).await;
    let status = response.status();
    let body = actix_test::read_body(response).await;
    let value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, value)
}

/// Register `username` and sign in, returning the user id and session cookie.
async fn sign_up(
    app: &impl Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
    username: &str,
) -> (i64, Cookie<'static>) {
    let email = format!("{username}@example.com");
    let (status, body) = call(
        app,
        actix_test::TestRequest::post().uri("/api/users/").set_json(json!({
            "email": email,
            "username": username,
            "first_name": "Test",
            "last_name": "Cook",
            "password": "s3cret",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    let id = body["id"].as_i64().expect("user id");

    let response = actix_test::call_service(
        app,
        actix_test::TestRequest::post()
            .uri("/api/auth/login/")
            .set_json(json!({ "email": email, "password": "s3cret" }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie")
        .into_owned();
    (id, cookie)
}

fn recipe_body(name: &str, salt: i64) -> Value {
    json!({
        "ingredients": [{ "id": 10, "amount": salt }, { "id": 11, "amount": 200 }],
        "tags": [1],
        "name": name,
        "text": "Mix and bake.",
        "cooking_time": 20,
    })
}

async fn create_recipe(
    app: &impl Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
    cookie: &Cookie<'static>,
    body: Value,
) -> i64 {
    let (status, created) = call(
        app,
        actix_test::TestRequest::post()
            .uri("/api/recipes/")
            .cookie(cookie.clone())
            .set_json(body),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{created}");
    created["id"].as_i64().expect("recipe id")
}

#[rstest]
#[actix_web::test]
async fn cart_aggregates_ingredients_across_recipes(store: InMemoryStore) {
    let app = app!(store);
    let (_, cookie) = sign_up(&app, "ada").await;
    let pancakes = create_recipe(&app, &cookie, recipe_body("Pancakes", 10)).await;
    let bread = create_recipe(&app, &cookie, recipe_body("Bread", 5)).await;

    for id in [pancakes, bread] {
        let (status, summary) = call(
            &app,
            actix_test::TestRequest::post()
                .uri(&format!("/api/recipes/{id}/shopping_cart/"))
                .cookie(cookie.clone()),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(summary["id"], id);
    }

    let (status, error) = call(
        &app,
        actix_test::TestRequest::post()
            .uri(&format!("/api/recipes/{bread}/shopping_cart/"))
            .cookie(cookie.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error["code"], "conflict");

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/recipes/download_shopping_cart/")
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = actix_test::read_body(response).await;
    let text = String::from_utf8(body.to_vec()).expect("utf-8 list");
    let lines: Vec<&str> = text.lines().collect();
    assert!(lines.contains(&"Salt - 15 (g)"), "{text}");
    assert!(lines.contains(&"Flour - 400 (g)"), "{text}");
    assert_eq!(lines.len(), 2);

    let (_, listed) = call(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/recipes/?is_in_shopping_cart=1")
            .cookie(cookie),
    )
    .await;
    assert_eq!(listed["count"], 2);
    assert_eq!(listed["results"][0]["is_in_shopping_cart"], true);
}

#[rstest]
#[actix_web::test]
async fn favorites_round_trip(store: InMemoryStore) {
    let app = app!(store);
    let (_, cookie) = sign_up(&app, "ada").await;
    let id = create_recipe(&app, &cookie, recipe_body("Pancakes", 10)).await;
    let uri = format!("/api/recipes/{id}/favorite/");

    let (status, _) = call(
        &app,
        actix_test::TestRequest::delete()
            .uri(&uri)
            .cookie(cookie.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = call(
        &app,
        actix_test::TestRequest::post().uri(&uri).cookie(cookie.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, recipe) = call(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/api/recipes/{id}/"))
            .cookie(cookie.clone()),
    )
    .await;
    assert_eq!(recipe["is_favorited"], true);
    assert_eq!(recipe["is_in_shopping_cart"], false);

    let (status, _) = call(
        &app,
        actix_test::TestRequest::delete()
            .uri(&uri)
            .cookie(cookie.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, anonymous) = call(
        &app,
        actix_test::TestRequest::get().uri(&format!("/api/recipes/{id}/")),
    )
    .await;
    assert_eq!(anonymous["is_favorited"], false);
}

#[rstest]
#[actix_web::test]
async fn invalid_compositions_write_nothing(store: InMemoryStore) {
    let app = app!(store);
    let (_, cookie) = sign_up(&app, "ada").await;

    let mut unknown = recipe_body("Mystery", 1);
    unknown["ingredients"] = json!([{ "id": 9999, "amount": 1 }]);
    let (status, error) = call(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/recipes/")
            .cookie(cookie.clone())
            .set_json(unknown),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(
        error["message"].as_str().is_some_and(|m| m.contains("9999")),
        "{error}"
    );

    let mut duplicated = recipe_body("Twice", 1);
    duplicated["tags"] = json!([1, 1]);
    let (status, _) = call(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/recipes/")
            .cookie(cookie.clone())
            .set_json(duplicated),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, listed) = call(&app, actix_test::TestRequest::get().uri("/api/recipes/")).await;
    assert_eq!(listed["count"], 0);
}

#[rstest]
#[actix_web::test]
async fn update_without_tags_keeps_recipe(store: InMemoryStore) {
    let app = app!(store);
    let (_, cookie) = sign_up(&app, "ada").await;
    let id = create_recipe(&app, &cookie, recipe_body("Pancakes", 10)).await;

    let (status, error) = call(
        &app,
        actix_test::TestRequest::patch()
            .uri(&format!("/api/recipes/{id}/"))
            .cookie(cookie.clone())
            .set_json(json!({
                "name": "Crepes",
                "ingredients": [{ "id": 12, "amount": 100 }],
            })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["details"]["field"], "tags");

    let (_, recipe) = call(
        &app,
        actix_test::TestRequest::get().uri(&format!("/api/recipes/{id}/")),
    )
    .await;
    assert_eq!(recipe["name"], "Pancakes");
    assert_eq!(recipe["ingredients"].as_array().map(Vec::len), Some(2));

    let (status, updated) = call(
        &app,
        actix_test::TestRequest::patch()
            .uri(&format!("/api/recipes/{id}/"))
            .cookie(cookie)
            .set_json(json!({
                "name": "Crepes",
                "tags": [2],
                "ingredients": [{ "id": 12, "amount": 100 }],
            })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Crepes");
    assert_eq!(updated["tags"][0]["slug"], "dinner");
    assert_eq!(updated["cooking_time"], 20);
}

#[rstest]
#[actix_web::test]
async fn only_the_author_may_delete(store: InMemoryStore) {
    let app = app!(store);
    let (_, author) = sign_up(&app, "ada").await;
    let (_, stranger) = sign_up(&app, "bob").await;
    let id = create_recipe(&app, &author, recipe_body("Pancakes", 10)).await;
    let uri = format!("/api/recipes/{id}/");

    let (status, _) = call(
        &app,
        actix_test::TestRequest::delete().uri(&uri).cookie(stranger),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = call(
        &app,
        actix_test::TestRequest::delete().uri(&uri).cookie(author),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = call(&app, actix_test::TestRequest::get().uri(&uri)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[rstest]
#[actix_web::test]
async fn short_link_is_stable_and_redirects(store: InMemoryStore) {
    let app = app!(store);
    let (_, cookie) = sign_up(&app, "ada").await;
    let id = create_recipe(&app, &cookie, recipe_body("Pancakes", 10)).await;
    let target = "https://foodgram.example/recipes/1";

    let mut links = Vec::new();
    for _ in 0..2 {
        let (status, body) = call(
            &app,
            actix_test::TestRequest::get()
                .uri(&format!("/api/recipes/{id}/get-link/"))
                .insert_header((header::REFERER, target)),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        links.push(body["short-link"].as_str().expect("short link").to_owned());
    }
    assert_eq!(links[0], links[1]);
    assert!(links[0].ends_with("/s/h0/"), "{}", links[0]);

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get().uri("/s/h0/").to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(
        response
            .headers()
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok()),
        Some(target)
    );
}

#[rstest]
#[actix_web::test]
async fn subscriptions_embed_latest_recipes(store: InMemoryStore) {
    let app = app!(store);
    let (author_id, author) = sign_up(&app, "chef").await;
    let (_, follower) = sign_up(&app, "fan").await;
    for name in ["Soup", "Stew", "Pie"] {
        create_recipe(&app, &author, recipe_body(name, 1)).await;
    }

    let (status, error) = call(
        &app,
        actix_test::TestRequest::post()
            .uri(&format!("/api/users/{author_id}/subscribe/"))
            .cookie(author.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{error}");

    let (status, card) = call(
        &app,
        actix_test::TestRequest::post()
            .uri(&format!("/api/users/{author_id}/subscribe/?recipes_limit=2"))
            .cookie(follower.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(card["is_subscribed"], true);
    assert_eq!(card["recipes_count"], 3);
    assert_eq!(card["recipes"].as_array().map(Vec::len), Some(2));
    assert_eq!(card["recipes"][0]["name"], "Pie");

    let (status, _) = call(
        &app,
        actix_test::TestRequest::post()
            .uri(&format!("/api/users/{author_id}/subscribe/"))
            .cookie(follower.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, page) = call(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/users/subscriptions/")
            .cookie(follower.clone()),
    )
    .await;
    assert_eq!(page["count"], 1);
    assert_eq!(page["results"][0]["username"], "chef");

    let (status, _) = call(
        &app,
        actix_test::TestRequest::delete()
            .uri(&format!("/api/users/{author_id}/subscribe/"))
            .cookie(follower.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, profile) = call(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/api/users/{author_id}/"))
            .cookie(follower),
    )
    .await;
    assert_eq!(profile["is_subscribed"], false);
}

#[rstest]
#[actix_web::test]
async fn duplicate_registration_conflicts(store: InMemoryStore) {
    let app = app!(store);
    sign_up(&app, "ada").await;

    let (status, error) = call(
        &app,
        actix_test::TestRequest::post().uri("/api/users/").set_json(json!({
            "email": "ADA@example.com",
            "username": "ada2",
            "first_name": "Ada",
            "last_name": "Again",
            "password": "pw",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT, "{error}");

    let (status, _) = call(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/auth/login/")
            .set_json(json!({ "email": "ada@example.com", "password": "wrong" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
