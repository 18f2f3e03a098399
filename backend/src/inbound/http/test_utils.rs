//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, Error, test, web};

use crate::domain::ports::{FixtureHeritagePointRepository, FixtureUserRepository};
use crate::domain::{AccountService, DisplayName, LoginCredentials};
use crate::inbound::http::state::HttpState;
use crate::map::MapStore;

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

/// In-memory application state plus handles onto its fixture ports.
///
/// Keep the harness alive for the duration of the test; dropping it removes
/// the temporary maps directory.
pub struct TestHarness {
    pub state: HttpState,
    pub users: Arc<FixtureUserRepository>,
    pub points: Arc<FixtureHeritagePointRepository>,
    _maps_dir: tempfile::TempDir,
}

/// Build a harness with empty fixture ports.
pub fn empty_state() -> TestHarness {
    let users = Arc::new(FixtureUserRepository::new());
    let points = Arc::new(FixtureHeritagePointRepository::new());
    let maps_dir = tempfile::tempdir().expect("temp maps dir");
    let state = HttpState::new(
        AccountService::new(users.clone()),
        points.clone(),
        MapStore::new(maps_dir.path().join("maps")),
    );
    TestHarness {
        state,
        users,
        points,
        _maps_dir: maps_dir,
    }
}

/// Build a harness with one registered account, known to the points fixture
/// as an owner.
pub async fn registered_state(username: &str, password: &str) -> TestHarness {
    let harness = empty_state();
    let credentials =
        LoginCredentials::try_from_parts(username, password).expect("valid test credentials");
    let id = harness
        .state
        .accounts
        .register(&credentials)
        .await
        .expect("test registration succeeds");
    harness
        .points
        .add_owner(id, DisplayName::new(username).expect("valid test name"));
    harness
}

/// Assemble the full application surface around the harness state.
pub fn test_app(
    harness: &TestHarness,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = Error,
        InitError = (),
    > + use<>,
> {
    App::new()
        .app_data(web::Data::new(harness.state.clone()))
        .wrap(test_session_middleware())
        .service(crate::inbound::http::accounts::login_form)
        .service(crate::inbound::http::accounts::login_submit)
        .service(crate::inbound::http::accounts::register_form)
        .service(crate::inbound::http::accounts::register_submit)
        .service(crate::inbound::http::accounts::logout)
        .service(crate::inbound::http::points::index)
        .service(crate::inbound::http::points::add_point_form)
        .service(crate::inbound::http::points::add_point_submit)
        .service(crate::inbound::http::directions::directions)
        .service(crate::inbound::http::maps::serve_map)
}

/// Log in through the HTTP surface and return the session cookie.
pub async fn login_as<S, B>(app: &S, username: &str, password: &str) -> actix_web::cookie::Cookie<'static>
where
    S: actix_web::dev::Service<actix_http::Request, Response = ServiceResponse<B>, Error = Error>,
    B: actix_web::body::MessageBody,
{
    let res = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/login")
            .set_form([
                ("nom_utilisateur", username),
                ("mot_de_passe", password),
            ])
            .to_request(),
    )
    .await;
    assert!(
        res.status().is_redirection(),
        "login should redirect, got {}",
        res.status(),
    );
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie set on login")
        .into_owned()
}
