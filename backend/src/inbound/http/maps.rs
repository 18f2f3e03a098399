//! Serves previously rendered map documents.

use actix_web::{HttpResponse, get, web};

use crate::domain::Error;
use crate::inbound::http::ApiResult;
use crate::inbound::http::redirect;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::map::MapStoreError;

/// `GET /maps/{filename}`: stream a rendered map document by name.
///
/// Names that are not plain file names report the same "not found" as absent
/// documents; the store never touches anything outside the maps directory.
#[get("/maps/{filename}")]
pub async fn serve_map(
    state: web::Data<HttpState>,
    session: SessionContext,
    filename: web::Path<String>,
) -> ApiResult<HttpResponse> {
    if session.current_user()?.is_none() {
        return Ok(redirect::to_login());
    }

    match state.maps.read_document(&filename) {
        Ok(contents) => Ok(HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(contents)),
        Err(MapStoreError::NotFound { .. } | MapStoreError::InvalidName { .. }) => {
            Err(Error::not_found("Carte introuvable."))
        }
        Err(MapStoreError::Io { message }) => Err(Error::internal(message)),
    }
}
