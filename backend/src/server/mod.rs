//! Server construction and middleware wiring.
//!
//! Everything under `/api/v1` shares one cookie session so flash messages
//! queued by a mutation can be drained by `GET /api/v1/messages`. Health
//! checks sit outside the session scope.

mod config;
mod state_builders;

pub use config::ServerConfig;
pub use state_builders::build_http_state;

use actix_session::SessionMiddleware;
use actix_session::config::{CookieContentSecurity, PersistentSession};
use actix_session::storage::CookieSessionStore;
use actix_web::cookie::time::Duration as CookieDuration;
use actix_web::dev::Server;
use actix_web::{App, HttpServer, web};

use dashboard::Trace;
use dashboard::inbound::http::campaigns::{campaign_details, list_campaigns};
use dashboard::inbound::http::content_lab::generate_content;
use dashboard::inbound::http::courses::{course_users, list_courses, search_user, site_info};
use dashboard::inbound::http::enrollments::{
    disenroll, enroll_campaign, enroll_manual, training_status,
};
use dashboard::inbound::http::health::{HealthState, live, ready};
use dashboard::inbound::http::messages::drain_messages;
use dashboard::inbound::http::session_config::SessionSettings;
use dashboard::inbound::http::state::HttpState;

const SESSION_COOKIE: &str = "session";
const SESSION_TTL_HOURS: i64 = 2;

fn flash_session(settings: &SessionSettings) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), settings.key.clone())
        .cookie_name(SESSION_COOKIE.to_owned())
        .cookie_path("/".to_owned())
        .cookie_secure(settings.cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(settings.same_site)
        .session_lifecycle(
            PersistentSession::default().session_ttl(CookieDuration::hours(SESSION_TTL_HOURS)),
        )
        .build()
}

/// Register the `/api/v1` handlers.
fn api_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(list_campaigns)
        .service(campaign_details)
        .service(enroll_manual)
        .service(training_status)
        .service(enroll_campaign)
        .service(disenroll)
        .service(list_courses)
        .service(course_users)
        .service(search_user)
        .service(site_info)
        .service(generate_content)
        .service(drain_messages);
}

#[cfg(debug_assertions)]
fn swagger_ui(cfg: &mut web::ServiceConfig) {
    use dashboard::ApiDoc;
    use utoipa::OpenApi;
    use utoipa_swagger_ui::SwaggerUi;

    cfg.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
}

#[cfg(not(debug_assertions))]
fn swagger_ui(_cfg: &mut web::ServiceConfig) {}

/// Construct an Actix HTTP server for the dashboard.
///
/// The health state is marked ready once the socket is bound.
///
/// # Errors
///
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    http_state: HttpState,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let http_state = web::Data::new(http_state);
    let ServerConfig { session, bind_addr } = config;
    let health = health_state.clone();

    let server = HttpServer::new(move || {
        App::new()
            .app_data(health.clone())
            .app_data(http_state.clone())
            .wrap(Trace)
            .service(
                web::scope("/api/v1")
                    .wrap(flash_session(&session))
                    .configure(api_routes),
            )
            .service(ready)
            .service(live)
            .configure(swagger_ui)
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
