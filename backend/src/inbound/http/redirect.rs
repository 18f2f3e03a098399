//! Redirect helpers shared by the HTML handlers.

use actix_web::HttpResponse;
use actix_web::http::header;

/// Path of the login entry point, the target of every auth gate.
pub const LOGIN_PATH: &str = "/login";

/// Redirect the browser to `location`.
pub fn to(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Redirect an anonymous caller to the login page.
pub fn to_login() -> HttpResponse {
    to(LOGIN_PATH)
}
