//! Map view and add-point handlers.

use actix_web::{HttpResponse, get, post, web};
use serde::Deserialize;

use crate::domain::geo::{
    ACCURACY_RADIUS_M, ACCURACY_RING_VERTICES, LatLon, bounding_center, circle_polygon,
};
use crate::domain::ports::{HeritageInsertError, HeritageQueryError};
use crate::domain::{Coordinates, Error, NewHeritagePoint, OwnedHeritagePoint, PointName};
use crate::inbound::http::ApiResult;
use crate::inbound::http::pages::{self, escape_html};
use crate::inbound::http::redirect;
use crate::inbound::http::session::{FlashNotice, SessionContext};
use crate::inbound::http::state::HttpState;
use crate::map::{CircleOverlay, MAP_DOCUMENT_FILENAME, MapDocument, Marker};

/// Viewport used when the user has no points yet (Lomé).
const FALLBACK_CENTER: LatLon = LatLon::new(6.13, 1.22);
const FALLBACK_ZOOM: u8 = 12;
/// Close-up zoom for a single point; wide zoom before fit-to-bounds kicks in.
const SINGLE_POINT_ZOOM: u8 = 16;
const MULTI_POINT_ZOOM: u8 = 13;

fn map_query_error(error: HeritageQueryError) -> Error {
    match error {
        HeritageQueryError::Connection { message } => Error::service_unavailable(message),
        HeritageQueryError::Query { message } => Error::internal(message),
    }
}

fn popup_html(point: &OwnedHeritagePoint) -> String {
    let directions_query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("lat", point.coordinates().latitude())
        .append_pair("lon", point.coordinates().longitude())
        .append_pair("nom", point.name().as_ref())
        .finish();
    format!(
        concat!(
            "<div style=\"font-family: Arial, sans-serif; font-size: 13.5px; ",
            "line-height: 1.35; min-width: 230px;\">",
            "<div style=\"font-size:14px;margin-bottom:6px;\"><b>🏠 {name}</b></div>",
            "<div style=\"color:#444;\">",
            "<b>👤 Propriétaire :</b> {owner}<br>",
            "<b>📍 Coordonnées :</b> {coords}",
            "</div>",
            "<div style=\"margin-top:10px;\">",
            "<a href=\"/itineraire?{query}\" target=\"_top\" ",
            "style=\"display:inline-block;padding:8px 12px;border-radius:12px;",
            "background:#111;color:#fff;text-decoration:none;font-weight:700;\">",
            "🧭 Itinéraire</a>",
            "</div>",
            "<div style=\"margin-top:8px;color:#777;font-size:12px;\">",
            "Astuce : ouvre l'itinéraire et choisis ton point de départ.",
            "</div>",
            "</div>",
        ),
        name = escape_html(point.name().as_ref()),
        owner = escape_html(point.owner_name().as_ref()),
        coords = escape_html(&point.coordinates().to_string()),
        query = directions_query,
    )
}

fn build_map_document(points: &[OwnedHeritagePoint]) -> MapDocument {
    let coords: Vec<LatLon> = points
        .iter()
        .map(|point| point.coordinates().location())
        .collect();

    let (center, zoom) = match bounding_center(&coords) {
        Some(center) if coords.len() == 1 => (center, SINGLE_POINT_ZOOM),
        Some(center) => (center, MULTI_POINT_ZOOM),
        None => (FALLBACK_CENTER, FALLBACK_ZOOM),
    };
    let mut document = MapDocument::new(center, zoom);
    if coords.len() >= 2 {
        document = document.with_fit_bounds(coords.clone());
    }

    for point in points {
        let location = point.coordinates().location();
        document.add_marker(Marker::new(location, popup_html(point)));
        document.add_circle(CircleOverlay::new(circle_polygon(
            location,
            ACCURACY_RADIUS_M,
            ACCURACY_RING_VERTICES,
        )));
    }
    document
}

/// `GET /`: render the caller's points onto a fresh map document and return
/// the page embedding it.
#[get("/")]
pub async fn index(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let Some(user) = session.current_user()? else {
        return Ok(redirect::to_login());
    };

    let points = state
        .points
        .list_for_user(user.id())
        .await
        .map_err(map_query_error)?;
    let document = build_map_document(&points);
    state
        .maps
        .write_document(MAP_DOCUMENT_FILENAME, &document.render())
        .map_err(|error| Error::internal(format!("failed to write map document: {error}")))?;

    let notices = session.take_notices()?;
    Ok(pages::html(pages::index_page(
        user.display_name().as_ref(),
        &notices,
    )))
}

/// Form fields submitted by the add-point page.
#[derive(Debug, Deserialize)]
pub struct AddPointForm {
    pub nom: String,
    pub latitude: String,
    pub longitude: String,
}

/// `GET /ajouter`: render the add-point form.
#[get("/ajouter")]
pub async fn add_point_form(session: SessionContext) -> ApiResult<HttpResponse> {
    let Some(user) = session.current_user()? else {
        return Ok(redirect::to_login());
    };
    let notices = session.take_notices()?;
    Ok(pages::html(pages::add_point_page(
        user.display_name().as_ref(),
        &notices,
    )))
}

/// `POST /ajouter`: validate, normalise, and insert a point for the session
/// user.
#[post("/ajouter")]
pub async fn add_point_submit(
    state: web::Data<HttpState>,
    session: SessionContext,
    form: web::Form<AddPointForm>,
) -> ApiResult<HttpResponse> {
    let Some(user) = session.current_user()? else {
        return Ok(redirect::to_login());
    };

    let Ok(name) = PointName::new(form.nom.as_str()) else {
        session.push_notice(FlashNotice::error("Nom du patrimoine invalide."))?;
        return Ok(redirect::to("/ajouter"));
    };
    let Ok(coordinates) = Coordinates::parse(&form.latitude, &form.longitude) else {
        session.push_notice(FlashNotice::error("Coordonnées invalides."))?;
        return Ok(redirect::to("/ajouter"));
    };

    let point = NewHeritagePoint::new(name, coordinates, user.id());
    match state.points.insert(&point).await {
        Ok(()) => {
            session.push_notice(FlashNotice::success("Patrimoine enregistré avec succès ✅"))?;
            Ok(redirect::to("/"))
        }
        Err(HeritageInsertError::DuplicateCoordinates) => {
            session.push_notice(FlashNotice::error(
                "Ces coordonnées existent déjà. Choisis un autre point.",
            ))?;
            Ok(redirect::to("/ajouter"))
        }
        Err(HeritageInsertError::Connection { message }) => {
            Err(Error::service_unavailable(message))
        }
        Err(HeritageInsertError::Query { message }) => Err(Error::internal(message)),
    }
}
