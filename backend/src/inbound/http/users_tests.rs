//! Handler tests for user account endpoints.

use super::*;
use crate::domain::{Email, Error, ImageInput, ImagePath, UserCard, Username};
use crate::domain::ports::Listing;
use crate::inbound::http::test_utils::{TestPorts, signed_in, test_app};
use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use mockall::predicate::eq;
use rstest::{fixture, rstest};
use serde_json::{Value, json};

#[derive(Debug)]
struct ValidationExpectation<'a> {
    field: &'a str,
    code: &'a str,
}

#[fixture]
fn ada() -> User {
    User {
        id: UserId::new(3),
        email: Email::new("ada@example.com").expect("email"),
        username: Username::new("ada").expect("username"),
        first_name: "Ada".to_owned(),
        last_name: "Lovelace".to_owned(),
        avatar: None,
        is_admin: false,
    }
}

fn register_body(username: &str, first_name: &str) -> RegisterRequest {
    RegisterRequest {
        email: "ada@example.com".to_owned(),
        username: username.to_owned(),
        first_name: first_name.to_owned(),
        last_name: "Lovelace".to_owned(),
        password: "s3cret".to_owned(),
    }
}

#[rstest]
#[actix_web::test]
async fn register_returns_created_account(ada: User) {
    let mut ports = TestPorts::default();
    ports
        .accounts
        .expect_register()
        .withf(|registration| {
            registration.username.as_str() == "ada" && registration.password() == "s3cret"
        })
        .times(1)
        .return_once(move |_| Ok(ada));
    let app = actix_test::init_service(test_app(ports.into_state())).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/users/")
            .set_json(register_body("ada", "Ada"))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(
        body,
        json!({
            "id": 3,
            "email": "ada@example.com",
            "username": "ada",
            "first_name": "Ada",
            "last_name": "Lovelace",
        })
    );
}

#[rstest]
#[case("ada lovelace", "Ada", ValidationExpectation { field: "username", code: "invalid" })]
#[case("ada", "   ", ValidationExpectation { field: "first_name", code: "empty" })]
#[actix_web::test]
async fn register_rejects_invalid_fields(
    #[case] username: &str,
    #[case] first_name: &str,
    #[case] expected: ValidationExpectation<'_>,
) {
    let app = actix_test::init_service(test_app(TestPorts::default().into_state())).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/users/")
            .set_json(register_body(username, first_name))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["details"]["field"], expected.field);
    assert_eq!(body["details"]["code"], expected.code);
}

#[rstest]
#[actix_web::test]
async fn me_requires_session() {
    let app = actix_test::init_service(test_app(TestPorts::default().into_state())).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get().uri("/api/users/me/").to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[rstest]
#[actix_web::test]
async fn me_is_not_mistaken_for_user_id(ada: User) {
    let mut ports = TestPorts::default();
    ports
        .users
        .expect_me()
        .with(eq(UserId::new(3)))
        .times(1)
        .return_once(move |_| {
            Ok(UserCard {
                user: ada,
                is_subscribed: false,
            })
        });
    let app = actix_test::init_service(test_app(ports.into_state())).await;
    let cookie = signed_in(&app, 3).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/users/me/")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get("Cache-Control")
            .and_then(|value| value.to_str().ok()),
        Some("private, no-cache, must-revalidate")
    );
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["username"], "ada");
    assert_eq!(body["avatar"], Value::Null);
}

#[rstest]
#[actix_web::test]
async fn profile_reports_subscription_for_viewer(ada: User) {
    let mut ports = TestPorts::default();
    ports
        .users
        .expect_get()
        .with(eq(Some(UserId::new(8))), eq(UserId::new(3)))
        .return_once(move |_, _| {
            Ok(UserCard {
                user: ada,
                is_subscribed: true,
            })
        });
    let app = actix_test::init_service(test_app(ports.into_state())).await;
    let cookie = signed_in(&app, 8).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/users/3/")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["is_subscribed"], true);
}

#[rstest]
#[actix_web::test]
async fn users_are_paginated(ada: User) {
    let mut ports = TestPorts::default();
    ports
        .users
        .expect_list()
        .withf(|viewer, page| viewer.is_none() && page.page() == 2 && page.limit() == 1)
        .return_once(move |_, _| {
            Ok(Listing::new(
                2,
                vec![UserCard {
                    user: ada,
                    is_subscribed: false,
                }],
            ))
        });
    let app = actix_test::init_service(test_app(ports.into_state())).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/users/?page=2&limit=1")
            .insert_header(("Host", "foodgram.example"))
            .to_request(),
    )
    .await;
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["count"], 2);
    assert_eq!(body["next"], Value::Null);
    assert_eq!(body["previous"], "http://foodgram.example/api/users/?limit=1");
}

#[rstest]
#[actix_web::test]
async fn avatar_upload_returns_public_url() {
    let mut ports = TestPorts::default();
    ports
        .accounts
        .expect_set_avatar()
        .withf(|user, image| *user == UserId::new(3) && matches!(image, ImageInput::Inline(_)))
        .return_once(|_, _| Ok(ImagePath::new("users/ada.png").expect("path")));
    let app = actix_test::init_service(test_app(ports.into_state())).await;
    let cookie = signed_in(&app, 3).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri("/api/users/me/avatar/")
            .cookie(cookie)
            .set_json(json!({ "avatar": "data:image/png;base64,aGVsbG8=" }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body, json!({ "avatar": "/media/users/ada.png" }));
}

#[rstest]
#[actix_web::test]
async fn avatar_without_payload_is_rejected() {
    let app = actix_test::init_service(test_app(TestPorts::default().into_state())).await;
    let cookie = signed_in(&app, 3).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri("/api/users/me/avatar/")
            .cookie(cookie)
            .set_json(json!({ "avatar": "" }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["details"]["field"], "avatar");
}

#[rstest]
#[actix_web::test]
async fn clearing_avatar_has_no_content() {
    let mut ports = TestPorts::default();
    ports
        .accounts
        .expect_clear_avatar()
        .with(eq(UserId::new(3)))
        .times(1)
        .return_once(|_| Ok(()));
    let app = actix_test::init_service(test_app(ports.into_state())).await;
    let cookie = signed_in(&app, 3).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::delete()
            .uri("/api/users/me/avatar/")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[rstest]
#[actix_web::test]
async fn wrong_current_password_is_bad_request() {
    let mut ports = TestPorts::default();
    ports
        .accounts
        .expect_change_password()
        .withf(|user, current, new| {
            *user == UserId::new(3) && current == "old" && new == "new"
        })
        .return_once(|_, _, _| {
            Err(Error::invalid_request("current password is incorrect")
                .with_details(json!({ "field": "current_password", "code": "mismatch" })))
        });
    let app = actix_test::init_service(test_app(ports.into_state())).await;
    let cookie = signed_in(&app, 3).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/users/set_password/")
            .cookie(cookie)
            .set_json(SetPasswordRequest {
                new_password: "new".to_owned(),
                current_password: "old".to_owned(),
            })
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["details"]["field"], "current_password");
}
