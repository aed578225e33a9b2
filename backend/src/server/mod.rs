//! HTTP server assembly: session cookies, the `/api` scope, short-link
//! redirects and health probes.

mod config;
mod state_builders;

pub use config::ServerConfig;

use state_builders::build_http_state;

use actix_session::config::{CookieContentSecurity, PersistentSession};
use actix_session::storage::CookieSessionStore;
use actix_session::SessionMiddleware;
use actix_web::cookie::time::Duration;
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use foodgram::Trace;
use foodgram::inbound::http::health::{HealthState, live, ready};
use foodgram::inbound::http::short_links::redirect;
use foodgram::inbound::http::state::HttpState;
use foodgram::inbound::http::{configure_api, configure_extractors};

/// Name of the private cookie carrying the logged-in user id.
const SESSION_COOKIE: &str = "session";
/// Login lifetime; the cookie survives browser restarts until then.
const SESSION_TTL: Duration = Duration::days(14);

/// Cookie and key material shared by every worker.
#[derive(Clone)]
struct SessionSettings {
    key: Key,
    secure: bool,
    same_site: SameSite,
}

impl SessionSettings {
    fn middleware(&self) -> SessionMiddleware<CookieSessionStore> {
        SessionMiddleware::builder(CookieSessionStore::default(), self.key.clone())
            .cookie_name(SESSION_COOKIE.to_owned())
            .cookie_path("/".to_owned())
            .cookie_secure(self.secure)
            .cookie_http_only(true)
            .cookie_content_security(CookieContentSecurity::Private)
            .cookie_same_site(self.same_site)
            .session_lifecycle(PersistentSession::default().session_ttl(SESSION_TTL))
            .build()
    }
}

/// Mount Swagger UI over the generated OpenAPI document.
#[cfg(debug_assertions)]
fn configure_docs(cfg: &mut web::ServiceConfig) {
    use foodgram::doc::ApiDoc;
    use utoipa::OpenApi;
    use utoipa_swagger_ui::SwaggerUi;

    cfg.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
}

#[cfg(not(debug_assertions))]
fn configure_docs(_cfg: &mut web::ServiceConfig) {}

/// Only `/api` reads the session; redirects and probes stay cookie-free.
fn build_app(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    session: SessionSettings,
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
        .app_data(health_state)
        .app_data(http_state)
        .configure(configure_extractors)
        .wrap(Trace)
        .service(
            web::scope("/api")
                .wrap(session.middleware())
                .configure(configure_api),
        )
        .service(redirect)
        .service(ready)
        .service(live)
        .configure(configure_docs)
}

/// Build the services over `config` and bind the listener.
///
/// `health_state` is marked ready once the socket is bound.
///
/// # Errors
/// Propagates [`std::io::Error`] when the media root cannot be opened or
/// binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let http_state = build_http_state(&config)?;
    let ServerConfig {
        key,
        cookie_secure,
        same_site,
        bind_addr,
        ..
    } = config;
    let session = SessionSettings {
        key,
        secure: cookie_secure,
        same_site,
    };

    let probes = health_state.clone();
    let server = HttpServer::new(move || {
        build_app(probes.clone(), http_state.clone(), session.clone())
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
