//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpResponse, test as actix_test, web};

use super::session::SessionContext;
use super::state::{HttpState, HttpStatePorts, Presentation};
use crate::domain::ports::{
    MockAccountsCommand, MockCatalogueQuery, MockMembershipCommand, MockRecipesCommand,
    MockRecipesQuery, MockShoppingListQuery, MockShortLinkCommand, MockSubscriptionsCommand,
    MockUsersQuery,
};
use crate::domain::{ApiResult, UserId};

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Mocked driving ports; set expectations on the fields you need.
#[derive(Default)]
pub struct TestPorts {
    pub accounts: MockAccountsCommand,
    pub users: MockUsersQuery,
    pub catalogue: MockCatalogueQuery,
    pub recipes: MockRecipesCommand,
    pub recipes_query: MockRecipesQuery,
    pub memberships: MockMembershipCommand,
    pub shopping_list: MockShoppingListQuery,
    pub short_links: MockShortLinkCommand,
    pub subscriptions: MockSubscriptionsCommand,
}

impl TestPorts {
    pub fn into_state(self) -> web::Data<HttpState> {
        let ports = HttpStatePorts {
            accounts: Arc::new(self.accounts),
            users: Arc::new(self.users),
            catalogue: Arc::new(self.catalogue),
            recipes: Arc::new(self.recipes),
            recipes_query: Arc::new(self.recipes_query),
            memberships: Arc::new(self.memberships),
            shopping_list: Arc::new(self.shopping_list),
            short_links: Arc::new(self.short_links),
            subscriptions: Arc::new(self.subscriptions),
        };
        web::Data::new(HttpState::new(ports, Presentation::default()))
    }
}

/// Application wired like production: every API route, the short-link
/// redirect, extractor error handlers and a test-only login route.
pub fn test_app(
    state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .wrap(test_session_middleware())
        .app_data(state)
        .configure(super::configure_extractors)
        .route(TEST_LOGIN_PATH, web::get().to(test_login))
        .service(web::scope("/api").configure(super::configure_api))
        .service(super::short_links::redirect)
}

/// Route that signs in as the user id in the path.
pub const TEST_LOGIN_PATH: &str = "/test-login/{id}";

pub async fn test_login(path: web::Path<i64>, session: SessionContext) -> ApiResult<HttpResponse> {
    session.persist_user(UserId::new(path.into_inner()))?;
    Ok(HttpResponse::NoContent().finish())
}

/// Sign in through [`TEST_LOGIN_PATH`] and return the session cookie.
pub async fn signed_in(
    app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    user_id: i64,
) -> Cookie<'static> {
    let request = actix_test::TestRequest::get()
        .uri(&format!("/test-login/{user_id}"))
        .to_request();
    let response = actix_test::call_service(app, request).await;
    assert!(response.status().is_success(), "test login failed");
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
        .expect("session cookie")
}
