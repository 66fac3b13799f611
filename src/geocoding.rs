pub mod nominatim;

use std::fmt;
use std::future::Future;
use std::pin::Pin;

/// A resolved location in decimal degrees.
#[derive(Debug, Clone, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
    pub display_name: String,
}

impl Coordinates {
    /// Rejects values outside the WGS84 degree ranges.
    pub fn new(lat: f64, lon: f64, display_name: String) -> Result<Self, GeocodeError> {
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            return Err(GeocodeError::Malformed(format!(
                "coordinates out of range: ({lat}, {lon})"
            )));
        }
        Ok(Self {
            lat,
            lon,
            display_name,
        })
    }
}

/// Errors from address lookup.
#[derive(Debug)]
pub enum GeocodeError {
    /// The service answered with a non-success HTTP status.
    Status(u16),
    /// The service answered, but with zero candidates.
    NotFound,
    Network(String),
    Malformed(String),
}

impl fmt::Display for GeocodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status(status) => write!(f, "geocoding service returned status {status}"),
            Self::NotFound => write!(f, "address not found"),
            Self::Network(msg) => write!(f, "network error: {msg}"),
            Self::Malformed(msg) => write!(f, "malformed geocoding response: {msg}"),
        }
    }
}

impl std::error::Error for GeocodeError {}

/// A geocoding provider that resolves a free-text place name to coordinates.
pub trait Geocoder: Send + Sync {
    fn geocode(
        &self,
        query: String,
    ) -> Pin<Box<dyn Future<Output = Result<Coordinates, GeocodeError>> + Send + '_>>;
}
