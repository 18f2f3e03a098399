//! End-to-end session flow over the HTTP surface with in-memory ports.
//!
//! Covers the register → login → add point → map view → logout journey and
//! the anonymous redirects guarding every authenticated route.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, Error, test, web};
use rstest::rstest;

use patrimap::domain::AccountService;
use patrimap::domain::ports::{FixtureHeritagePointRepository, FixtureUserRepository};
use patrimap::inbound::http::state::HttpState;
use patrimap::inbound::http::{accounts, directions, maps, points};
use patrimap::map::{MAP_DOCUMENT_FILENAME, MapStore};

struct Harness {
    state: HttpState,
    points: Arc<FixtureHeritagePointRepository>,
    _maps_dir: tempfile::TempDir,
}

fn harness() -> Harness {
    let users = Arc::new(FixtureUserRepository::new());
    let heritage = Arc::new(FixtureHeritagePointRepository::new());
    let maps_dir = tempfile::tempdir().expect("temp maps dir");
    let state = HttpState::new(
        AccountService::new(users),
        heritage.clone(),
        MapStore::new(maps_dir.path().join("maps")),
    );
    Harness {
        state,
        points: heritage,
        _maps_dir: maps_dir,
    }
}

fn app(
    state: &HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = Error,
        InitError = (),
    > + use<>,
> {
    let session = SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build();
    App::new()
        .app_data(web::Data::new(state.clone()))
        .wrap(session)
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

fn session_cookie<B>(res: &ServiceResponse<B>) -> Cookie<'static> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie set")
        .into_owned()
}

fn location<B>(res: &ServiceResponse<B>) -> &str {
    res.headers()
        .get("location")
        .expect("location header")
        .to_str()
        .expect("ascii location")
}

async fn register<S, B>(app: &S, username: &str, password: &str)
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = Error>,
    B: actix_web::body::MessageBody,
{
    let res = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/inscription")
            .set_form([
                ("nom_utilisateur", username),
                ("mot_de_passe", password),
            ])
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location(&res), "/login");
}

async fn login<S, B>(app: &S, username: &str, password: &str) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = Error>,
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
    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location(&res), "/");
    session_cookie(&res)
}

#[rstest]
#[case("/")]
#[case("/ajouter")]
#[case("/maps/carte.html")]
#[case("/itineraire?lat=6.13&lon=1.22")]
#[actix_web::test]
async fn every_authenticated_route_redirects_anonymous_callers(#[case] path: &str) {
    let harness = harness();
    let app = test::init_service(app(&harness.state)).await;

    let res = test::call_service(&app, test::TestRequest::get().uri(path).to_request()).await;
    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location(&res), "/login");
}

#[actix_web::test]
async fn the_full_journey_from_registration_to_logout() {
    let harness = harness();
    let app = test::init_service(app(&harness.state)).await;

    register(&app, "ada", "s3cret").await;

    // The points fixture joins owner names the way the SQL join would.
    let account = harness
        .state
        .accounts
        .authenticate(
            &patrimap::domain::LoginCredentials::try_from_parts("ada", "s3cret")
                .expect("valid credentials"),
        )
        .await
        .expect("registered user authenticates");
    harness
        .points
        .add_owner(account.id(), account.display_name().clone());

    let cookie = login(&app, "ada", "s3cret").await;

    // Add a point; the success notice lands on the next page.
    let add = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/ajouter")
            .cookie(cookie.clone())
            .set_form([
                ("nom", "Palais de Lomé"),
                ("latitude", "6.1319"),
                ("longitude", "1.2228"),
            ])
            .to_request(),
    )
    .await;
    assert_eq!(add.status(), StatusCode::FOUND);
    assert_eq!(location(&add), "/");
    let cookie = session_cookie(&add);

    // The map view renders the document and shows the notice once.
    let index = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/")
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(index.status(), StatusCode::OK);
    let cookie = session_cookie(&index);
    let body = test::read_body(index).await;
    let body = std::str::from_utf8(&body).expect("utf8 body");
    assert!(body.contains("Patrimoine enregistré avec succès"));

    // The stored document carries the marker and its accuracy ring.
    let map = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/maps/{MAP_DOCUMENT_FILENAME}"))
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(map.status(), StatusCode::OK);
    let map_body = test::read_body(map).await;
    let map_body = std::str::from_utf8(&map_body).expect("utf8 body");
    assert!(map_body.contains("L.marker([6.131900, 1.222800])"));
    assert!(map_body.contains("L.polygon("));
    assert!(map_body.contains("Palais de Lomé"));

    // Directions to the recorded point.
    let route = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/itineraire?lat=6.131900&lon=1.222800&nom=Palais%20de%20Lom%C3%A9")
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(route.status(), StatusCode::OK);

    // Logout clears the session; the map view gates again.
    let logout = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/logout")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(logout.status(), StatusCode::FOUND);
    let cleared = session_cookie(&logout);

    let gated = test::call_service(
        &app,
        test::TestRequest::get().uri("/").cookie(cleared).to_request(),
    )
    .await;
    assert_eq!(gated.status(), StatusCode::FOUND);
    assert_eq!(location(&gated), "/login");
}

#[actix_web::test]
async fn the_same_coordinates_cannot_be_recorded_twice() {
    let harness = harness();
    let app = test::init_service(app(&harness.state)).await;

    register(&app, "ada", "s3cret").await;
    let cookie = login(&app, "ada", "s3cret").await;

    let first = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/ajouter")
            .cookie(cookie.clone())
            .set_form([
                ("nom", "Palais"),
                ("latitude", "12.345678"),
                ("longitude", "-1.234567"),
            ])
            .to_request(),
    )
    .await;
    assert_eq!(location(&first), "/");

    // `12.3456780` normalises to the same pair and must collide.
    let second = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/ajouter")
            .cookie(cookie.clone())
            .set_form([
                ("nom", "Autre"),
                ("latitude", "12.3456780"),
                ("longitude", "-1.234567"),
            ])
            .to_request(),
    )
    .await;
    assert_eq!(second.status(), StatusCode::FOUND);
    assert_eq!(location(&second), "/ajouter");

    let form_page = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/ajouter")
            .cookie(session_cookie(&second))
            .to_request(),
    )
    .await;
    let body = test::read_body(form_page).await;
    let body = std::str::from_utf8(&body).expect("utf8 body");
    assert!(body.contains("Ces coordonnées existent déjà"));
}
