use geo::{GeodesicDistance, Point};

use crate::dataset::CollectionPoint;

/// The closest collection point and its distance from the user.
#[derive(Debug)]
pub struct Nearest<'a> {
    pub point: &'a CollectionPoint,
    pub km: f64,
}

/// Geodesic distance in kilometers on the WGS84 ellipsoid.
pub fn distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    Point::new(lon1, lat1).geodesic_distance(&Point::new(lon2, lat2)) / 1000.0
}

/// Linear scan for the closest collection point to `(lat, lon)`.
///
/// Strict comparison keeps the earliest entry on ties, so the result is
/// deterministic in dataset order. Returns `None` for an empty dataset.
/// Pure function of its inputs.
pub fn nearest(lat: f64, lon: f64, points: &[CollectionPoint]) -> Option<Nearest<'_>> {
    let mut best: Option<Nearest<'_>> = None;
    for point in points {
        let km = distance_km(lat, lon, point.lat, point.lon);
        match &best {
            Some(found) if km >= found.km => {}
            _ => best = Some(Nearest { point, km }),
        }
    }
    best
}
