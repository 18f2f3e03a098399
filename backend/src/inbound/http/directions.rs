//! Directions view for a selected heritage point.

use actix_web::{HttpResponse, get, web};
use serde::Deserialize;

use crate::domain::Coordinates;
use crate::inbound::http::ApiResult;
use crate::inbound::http::pages;
use crate::inbound::http::redirect;
use crate::inbound::http::session::{FlashNotice, SessionContext};

const DEFAULT_DESTINATION_NAME: &str = "Patrimoine";
const MISSING_DESTINATION: &str = "Patrimoine introuvable (coordonnées manquantes).";

/// Query parameters of `GET /itineraire`.
///
/// Coordinates arrive as strings so an unparseable value degrades into the
/// missing-destination path instead of a bare 400.
#[derive(Debug, Deserialize)]
pub struct DirectionsQuery {
    pub lat: Option<String>,
    pub lon: Option<String>,
    pub nom: Option<String>,
}

/// `GET /itineraire?lat=&lon=&nom=`: render the directions page for a
/// destination; route computation is delegated to the external mapping
/// service.
#[get("/itineraire")]
pub async fn directions(
    session: SessionContext,
    query: web::Query<DirectionsQuery>,
) -> ApiResult<HttpResponse> {
    let Some(user) = session.current_user()? else {
        return Ok(redirect::to_login());
    };

    let destination = match (query.lat.as_deref(), query.lon.as_deref()) {
        (Some(lat), Some(lon)) => Coordinates::parse(lat, lon).ok(),
        _ => None,
    };
    let Some(destination) = destination else {
        session.push_notice(FlashNotice::error(MISSING_DESTINATION))?;
        return Ok(redirect::to("/"));
    };

    let name = query
        .nom
        .clone()
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_DESTINATION_NAME.to_owned());
    let notices = session.take_notices()?;
    Ok(pages::html(pages::directions_page(
        user.display_name().as_ref(),
        &name,
        destination.location(),
        &notices,
    )))
}

#[cfg(test)]
mod tests {
    use crate::inbound::http::test_utils::{login_as, registered_state, test_app};
    use actix_web::http::StatusCode;
    use actix_web::test;
    use rstest::rstest;

    #[actix_web::test]
    async fn a_full_destination_renders_the_directions_page() {
        let harness = registered_state("ada", "s3cret").await;
        let app = test::init_service(test_app(&harness)).await;
        let cookie = login_as(&app, "ada", "s3cret").await;

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/itineraire?lat=6.130000&lon=1.220000&nom=Palais")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let body = test::read_body(res).await;
        let body = std::str::from_utf8(&body).expect("utf8 body");
        assert!(body.contains("Itinéraire vers Palais"));
        assert!(body.contains("6.130000, 1.220000"));
    }

    #[rstest]
    #[case("/itineraire")]
    #[case("/itineraire?lat=6.13")]
    #[case("/itineraire?lon=1.22")]
    #[case("/itineraire?lat=somewhere&lon=1.22")]
    #[actix_web::test]
    async fn missing_or_unparseable_destinations_redirect_home(#[case] path: &str) {
        let harness = registered_state("ada", "s3cret").await;
        let app = test::init_service(test_app(&harness)).await;
        let cookie = login_as(&app, "ada", "s3cret").await;

        let res = test::call_service(
            &app,
            test::TestRequest::get().uri(path).cookie(cookie).to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::FOUND);
        assert_eq!(
            res.headers().get("location").map(|v| v.as_bytes()),
            Some(b"/".as_slice()),
        );
    }

    #[actix_web::test]
    async fn a_missing_name_falls_back_to_the_generic_label() {
        let harness = registered_state("ada", "s3cret").await;
        let app = test::init_service(test_app(&harness)).await;
        let cookie = login_as(&app, "ada", "s3cret").await;

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/itineraire?lat=6.130000&lon=1.220000")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        let body = test::read_body(res).await;
        let body = std::str::from_utf8(&body).expect("utf8 body");
        assert!(body.contains("Itinéraire vers Patrimoine"));
    }
}
