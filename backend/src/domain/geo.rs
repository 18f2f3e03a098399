//! Planar geospatial helpers for map overlays.
//!
//! Accuracy rings and viewport centres only need metre-level precision over
//! tens of metres, so these helpers use a flat-Earth approximation: a fixed
//! metres-per-degree constant for latitude and a cos(latitude) correction for
//! longitude. Precision degrades for large radii or near the poles, which is
//! acceptable for ~50 m GPS accuracy rings.

/// Approximate length of one degree of latitude, in metres.
pub const METERS_PER_DEGREE_LAT: f64 = 111_320.0;

/// Radius used for GPS accuracy rings, in metres.
pub const ACCURACY_RADIUS_M: f64 = 50.0;

/// Vertex count used for accuracy rings; higher looks rounder.
pub const ACCURACY_RING_VERTICES: usize = 28;

/// A WGS84 coordinate pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    /// Build a coordinate pair from decimal degrees.
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Approximate a circle of `radius_m` metres around `center` as a polygon.
///
/// Returns `vertex_count` vertices evenly spaced around the circle, in
/// counter-clockwise order. The first vertex is not repeated at the end; the
/// consumer closes the loop.
pub fn circle_polygon(center: LatLon, radius_m: f64, vertex_count: usize) -> Vec<LatLon> {
    let lat_scale = radius_m / METERS_PER_DEGREE_LAT;
    let lon_scale = radius_m / (METERS_PER_DEGREE_LAT * center.lat.to_radians().cos());

    (0..vertex_count)
        .map(|step| {
            let angle = std::f64::consts::TAU * (step as f64) / (vertex_count as f64);
            LatLon::new(
                center.lat + lat_scale * angle.sin(),
                center.lon + lon_scale * angle.cos(),
            )
        })
        .collect()
}

/// Arithmetic-mean centre of a point set, or `None` when it is empty.
///
/// Callers wanting an exact viewport over two or more points should also issue
/// a fit-to-bounds request to the map document; the mean is only the initial
/// centre.
pub fn bounding_center(points: &[LatLon]) -> Option<LatLon> {
    if points.is_empty() {
        return None;
    }
    let count = points.len() as f64;
    let lat = points.iter().map(|point| point.lat).sum::<f64>() / count;
    let lon = points.iter().map(|point| point.lon).sum::<f64>() / count;
    Some(LatLon::new(lat, lon))
}
