//! Browsable map document generation.
//!
//! Builds a self-contained HTML document that renders an interactive Leaflet
//! map (tile layer, markers with popups, accuracy-ring polygons) and leaves
//! the actual map runtime to the browser. The document is written to disk by
//! [`store::MapStore`] and served back over the map-file route.

mod store;

pub use store::{MAP_DOCUMENT_FILENAME, MapStore, MapStoreError};

use crate::domain::geo::LatLon;

const CIRCLE_COLOR: &str = "blue";
const CIRCLE_WEIGHT: u8 = 2;
const CIRCLE_FILL_OPACITY: f64 = 0.18;

/// A map pin with an HTML popup.
#[derive(Debug, Clone)]
pub struct Marker {
    location: LatLon,
    popup_html: String,
}

impl Marker {
    /// Place a marker with the given popup content.
    ///
    /// `popup_html` is embedded as-is; callers escape any user-provided text
    /// before building it.
    pub fn new(location: LatLon, popup_html: impl Into<String>) -> Self {
        Self {
            location,
            popup_html: popup_html.into(),
        }
    }
}

/// A filled polygon approximating a GPS accuracy ring.
#[derive(Debug, Clone)]
pub struct CircleOverlay {
    vertices: Vec<LatLon>,
}

impl CircleOverlay {
    /// Wrap a polygon ring produced by [`crate::domain::geo::circle_polygon`].
    pub fn new(vertices: Vec<LatLon>) -> Self {
        Self { vertices }
    }
}

/// Builder for a renderable map document.
#[derive(Debug, Clone)]
pub struct MapDocument {
    center: LatLon,
    zoom: u8,
    fit_bounds: Option<Vec<LatLon>>,
    markers: Vec<Marker>,
    circles: Vec<CircleOverlay>,
}

impl MapDocument {
    /// Start a document centred at `center` with the given initial zoom.
    pub fn new(center: LatLon, zoom: u8) -> Self {
        Self {
            center,
            zoom,
            fit_bounds: None,
            markers: Vec::new(),
            circles: Vec::new(),
        }
    }

    /// Ask the map to adjust its viewport so all `points` are visible.
    pub fn with_fit_bounds(mut self, points: Vec<LatLon>) -> Self {
        self.fit_bounds = Some(points);
        self
    }

    /// Add a marker to the document.
    pub fn add_marker(&mut self, marker: Marker) {
        self.markers.push(marker);
    }

    /// Add an accuracy-ring overlay to the document.
    pub fn add_circle(&mut self, circle: CircleOverlay) {
        self.circles.push(circle);
    }

    /// Render the full HTML document.
    pub fn render(&self) -> String {
        let mut script = String::new();
        script.push_str(&format!(
            "const map = L.map('map').setView({}, {});\n",
            latlng(self.center),
            self.zoom,
        ));
        script.push_str(concat!(
            "L.tileLayer('https://tile.openstreetmap.org/{z}/{x}/{y}.png', {\n",
            "  maxZoom: 19,\n",
            "  attribution: '&copy; OpenStreetMap contributors'\n",
            "}).addTo(map);\n",
        ));

        for marker in &self.markers {
            script.push_str(&format!(
                "L.marker({}).addTo(map).bindPopup(\"{}\", {{maxWidth: 280}});\n",
                latlng(marker.location),
                escape_js(&marker.popup_html),
            ));
        }
        for circle in &self.circles {
            script.push_str(&format!(
                "L.polygon([{}], {{color: '{CIRCLE_COLOR}', weight: {CIRCLE_WEIGHT}, \
                 fill: true, fillOpacity: {CIRCLE_FILL_OPACITY}}}).addTo(map);\n",
                latlng_list(&circle.vertices),
            ));
        }
        if let Some(points) = self.fit_bounds.as_ref().filter(|points| !points.is_empty()) {
            script.push_str(&format!("map.fitBounds([{}]);\n", latlng_list(points)));
        }

        format!(
            concat!(
                "<!doctype html>\n",
                "<html lang=\"fr\">\n",
                "<head>\n",
                "<meta charset=\"utf-8\">\n",
                "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
                "<title>Carte des patrimoines</title>\n",
                "<link rel=\"stylesheet\" href=\"https://unpkg.com/leaflet@1.9.4/dist/leaflet.css\">\n",
                "<script src=\"https://unpkg.com/leaflet@1.9.4/dist/leaflet.js\"></script>\n",
                "<style>html, body, #map {{ height: 100%; margin: 0; }}</style>\n",
                "</head>\n",
                "<body>\n",
                "<div id=\"map\"></div>\n",
                "<script>\n",
                "{script}",
                "</script>\n",
                "</body>\n",
                "</html>\n",
            ),
            script = script,
        )
    }
}

fn latlng(point: LatLon) -> String {
    format!("[{:.6}, {:.6}]", point.lat, point.lon)
}

fn latlng_list(points: &[LatLon]) -> String {
    points
        .iter()
        .map(|point| latlng(*point))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Escape text for embedding inside a double-quoted JavaScript string.
///
/// `</` becomes `<\/` so popup content can never terminate the enclosing
/// script element.
pub(crate) fn escape_js(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    let mut previous = '\0';
    for c in input.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\'' => escaped.push_str("\\'"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '/' if previous == '<' => escaped.push_str("\\/"),
            _ => escaped.push(c),
        }
        previous = c;
    }
    escaped
}
