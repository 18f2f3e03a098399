//! Server-rendered HTML pages.
//!
//! The application renders a handful of small pages around the generated map
//! document. Pages are plain format strings over one shared layout; all
//! user-provided text goes through [`escape_html`] first.

use actix_web::HttpResponse;
use actix_web::http::StatusCode;

use crate::domain::geo::LatLon;
use crate::inbound::http::session::{FlashLevel, FlashNotice};
use crate::middleware::TraceId;

/// Escape text for safe interpolation into HTML content or attributes.
pub(crate) fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Wrap a rendered page body in a 200 HTML response.
pub(crate) fn html(body: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(body)
}

const STYLE: &str = concat!(
    "body { font-family: Arial, sans-serif; margin: 0; background: #f5f4f0; color: #222; }\n",
    "header { display: flex; align-items: center; gap: 16px; padding: 12px 20px; ",
    "background: #111; color: #fff; }\n",
    "header a { color: #fff; text-decoration: none; font-weight: 700; }\n",
    "main { max-width: 860px; margin: 20px auto; padding: 0 16px; }\n",
    "form { display: grid; gap: 10px; max-width: 360px; }\n",
    "input { padding: 8px 10px; border: 1px solid #bbb; border-radius: 8px; }\n",
    "button { padding: 10px 14px; border: 0; border-radius: 12px; background: #111; ",
    "color: #fff; font-weight: 700; cursor: pointer; }\n",
    "iframe { width: 100%; height: 70vh; border: 1px solid #ccc; border-radius: 12px; }\n",
    ".notice { padding: 10px 14px; border-radius: 8px; margin: 10px 0; }\n",
    ".notice.success { background: #e4f4e4; color: #1d5c1d; }\n",
    ".notice.error { background: #fae3e3; color: #7a1c1c; }\n",
    ".muted { color: #777; font-size: 13px; }\n",
);

fn render_notices(notices: &[FlashNotice]) -> String {
    notices
        .iter()
        .map(|notice| {
            let class = match notice.level {
                FlashLevel::Success => "success",
                FlashLevel::Error => "error",
            };
            format!(
                "<div class=\"notice {class}\">{}</div>\n",
                escape_html(&notice.message)
            )
        })
        .collect()
}

fn layout(title: &str, nav: &str, notices: &[FlashNotice], body: &str) -> String {
    format!(
        concat!(
            "<!doctype html>\n",
            "<html lang=\"fr\">\n",
            "<head>\n",
            "<meta charset=\"utf-8\">\n",
            "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
            "<title>{title}</title>\n",
            "<style>\n{style}</style>\n",
            "</head>\n",
            "<body>\n",
            "<header><a href=\"/\">Patrimap</a>{nav}</header>\n",
            "<main>\n{notices}{body}\n</main>\n",
            "</body>\n",
            "</html>\n",
        ),
        title = escape_html(title),
        style = STYLE,
        nav = nav,
        notices = render_notices(notices),
        body = body,
    )
}

fn authenticated_nav(user_name: &str) -> String {
    format!(
        concat!(
            "<span style=\"margin-left:auto\">👤 {user}</span>",
            "<a href=\"/ajouter\">Ajouter</a>",
            "<a href=\"/logout\">Déconnexion</a>",
        ),
        user = escape_html(user_name),
    )
}

/// Map/list view embedding the generated map document.
pub(crate) fn index_page(user_name: &str, notices: &[FlashNotice]) -> String {
    let body = concat!(
        "<h1>Mes patrimoines</h1>\n",
        "<iframe src=\"/maps/carte.html\" title=\"Carte des patrimoines\"></iframe>\n",
        "<p class=\"muted\">Clique sur un marqueur pour voir le patrimoine et son itinéraire.</p>",
    );
    layout(
        "Carte des patrimoines",
        &authenticated_nav(user_name),
        notices,
        body,
    )
}

/// Login form.
pub(crate) fn login_page(notices: &[FlashNotice]) -> String {
    let body = concat!(
        "<h1>Connexion</h1>\n",
        "<form method=\"post\" action=\"/login\">\n",
        "<input name=\"nom_utilisateur\" placeholder=\"Nom d'utilisateur\" required>\n",
        "<input name=\"mot_de_passe\" type=\"password\" placeholder=\"Mot de passe\" required>\n",
        "<button type=\"submit\">Se connecter</button>\n",
        "</form>\n",
        "<p><a href=\"/inscription\">Créer un compte</a></p>",
    );
    layout("Connexion", "", notices, body)
}

/// Registration form.
pub(crate) fn register_page(notices: &[FlashNotice]) -> String {
    let body = concat!(
        "<h1>Inscription</h1>\n",
        "<form method=\"post\" action=\"/inscription\">\n",
        "<input name=\"nom_utilisateur\" placeholder=\"Nom d'utilisateur\" required>\n",
        "<input name=\"mot_de_passe\" type=\"password\" placeholder=\"Mot de passe\" required>\n",
        "<button type=\"submit\">Créer le compte</button>\n",
        "</form>\n",
        "<p><a href=\"/login\">Déjà inscrit ? Se connecter</a></p>",
    );
    layout("Inscription", "", notices, body)
}

/// Add-point form.
pub(crate) fn add_point_page(user_name: &str, notices: &[FlashNotice]) -> String {
    let body = concat!(
        "<h1>Ajouter un patrimoine</h1>\n",
        "<form method=\"post\" action=\"/ajouter\">\n",
        "<input name=\"nom\" placeholder=\"Nom du patrimoine\" required>\n",
        "<input name=\"latitude\" placeholder=\"Latitude (ex : 6.130000)\" required>\n",
        "<input name=\"longitude\" placeholder=\"Longitude (ex : 1.220000)\" required>\n",
        "<button type=\"submit\">Enregistrer</button>\n",
        "</form>",
    );
    layout(
        "Ajouter un patrimoine",
        &authenticated_nav(user_name),
        notices,
        body,
    )
}

/// Directions page for a destination point.
///
/// Route computation is delegated to OpenStreetMap's directions service; this
/// page only frames the destination and links out.
pub(crate) fn directions_page(
    user_name: &str,
    destination_name: &str,
    destination: LatLon,
    notices: &[FlashNotice],
) -> String {
    let body = format!(
        concat!(
            "<h1>🧭 Itinéraire vers {name}</h1>\n",
            "<p><b>📍 Destination :</b> {lat:.6}, {lon:.6}</p>\n",
            "<p><a href=\"https://www.openstreetmap.org/directions?to={lat:.6}%2C{lon:.6}\" ",
            "target=\"_blank\" rel=\"noopener\">Ouvrir l'itinéraire dans OpenStreetMap</a></p>\n",
            "<p class=\"muted\">Astuce : ouvre l'itinéraire et choisis ton point de départ.</p>\n",
            "<p><a href=\"/\">← Retour à la carte</a></p>",
        ),
        name = escape_html(destination_name),
        lat = destination.lat,
        lon = destination.lon,
    );
    layout(
        "Itinéraire",
        &authenticated_nav(user_name),
        notices,
        &body,
    )
}

/// Minimal error page for residual failures.
pub(crate) fn error_page(status: StatusCode, message: &str, trace_id: Option<TraceId>) -> String {
    let trace = trace_id
        .map(|id| format!("<p class=\"muted\">Référence : {id}</p>"))
        .unwrap_or_default();
    let body = format!(
        concat!(
            "<h1>Erreur {status}</h1>\n",
            "<p>{message}</p>\n",
            "{trace}\n",
            "<p><a href=\"/\">← Retour à la carte</a></p>",
        ),
        status = status.as_u16(),
        message = escape_html(message),
        trace = trace,
    );
    layout("Erreur", "", &[], &body)
}
