//! Server construction and middleware wiring.

mod config;

pub use config::{ConfigError, ServerConfig};

use std::sync::Arc;

use actix_session::{
    SessionMiddleware,
    config::{CookieContentSecurity, PersistentSession},
    storage::CookieSessionStore,
};
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use patrimap::Trace;
use patrimap::domain::AccountService;
use patrimap::inbound::http::state::HttpState;
use patrimap::inbound::http::{accounts, directions, maps, points};
use patrimap::map::MapStore;
use patrimap::outbound::persistence::{
    ConnectionFactory, DieselHeritagePointRepository, DieselUserRepository,
};

fn build_app(
    state: web::Data<HttpState>,
    key: Key,
    cookie_secure: bool,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let session = SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(SameSite::Lax)
        .session_lifecycle(
            PersistentSession::default().session_ttl(actix_web::cookie::time::Duration::hours(2)),
        )
        .build();

    App::new()
        .app_data(state)
        .wrap(session)
        .wrap(Trace)
        .service(points::index)
        .service(points::add_point_form)
        .service(points::add_point_submit)
        .service(accounts::login_form)
        .service(accounts::login_submit)
        .service(accounts::register_form)
        .service(accounts::register_submit)
        .service(accounts::logout)
        .service(directions::directions)
        .service(maps::serve_map)
}

/// Construct the Actix HTTP server from the given configuration.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(config: ServerConfig, key: Key) -> std::io::Result<Server> {
    let factory = ConnectionFactory::new(config.store.clone());
    let state = web::Data::new(HttpState::new(
        AccountService::new(Arc::new(DieselUserRepository::new(factory.clone()))),
        Arc::new(DieselHeritagePointRepository::new(factory)),
        MapStore::new(config.maps_dir.clone()),
    ));
    let cookie_secure = config.cookie_secure;

    let server = HttpServer::new(move || build_app(state.clone(), key.clone(), cookie_secure))
        .bind(config.bind_addr)?
        .run();
    Ok(server)
}
