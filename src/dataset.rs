use std::fmt;
use std::path::Path;

/// A civil-protection assembly point from the static dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionPoint {
    pub name: String,
    pub address: String,
    pub notes: String,
    pub lat: f64,
    pub lon: f64,
}

/// Errors while loading the collection point dataset. Fatal at startup.
#[derive(Debug)]
pub enum DatasetError {
    Io(std::io::Error),
    Json(serde_json::Error),
    BadEntry { name: String, reason: String },
}

impl fmt::Display for DatasetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "cannot read dataset: {e}"),
            Self::Json(e) => write!(f, "cannot parse dataset: {e}"),
            Self::BadEntry { name, reason } => write!(f, "bad entry {name:?}: {reason}"),
        }
    }
}

impl std::error::Error for DatasetError {}

#[derive(serde::Deserialize)]
struct RawDataset {
    points_of_collection: Vec<RawPoint>,
}

#[derive(serde::Deserialize)]
struct RawPoint {
    name: String,
    address: String,
    notes: String,
    gps: String,
}

/// Load the dataset from disk, preserving entry order.
pub fn load(path: &Path) -> Result<Vec<CollectionPoint>, DatasetError> {
    let text = std::fs::read_to_string(path).map_err(DatasetError::Io)?;
    from_json(&text)
}

fn from_json(text: &str) -> Result<Vec<CollectionPoint>, DatasetError> {
    let raw: RawDataset = serde_json::from_str(text).map_err(DatasetError::Json)?;
    raw.points_of_collection
        .into_iter()
        .map(|point| {
            let (lat, lon) = parse_gps(&point.gps).map_err(|reason| DatasetError::BadEntry {
                name: point.name.clone(),
                reason,
            })?;
            Ok(CollectionPoint {
                name: point.name,
                address: point.address,
                notes: point.notes,
                lat,
                lon,
            })
        })
        .collect()
}

/// Parse a `"lat,lon"` pair of decimal degrees.
fn parse_gps(gps: &str) -> Result<(f64, f64), String> {
    let Some((lat, lon)) = gps.split_once(',') else {
        return Err(format!("gps is not \"lat,lon\": {gps:?}"));
    };
    let lat: f64 = lat
        .trim()
        .parse()
        .map_err(|e| format!("invalid latitude: {e}"))?;
    let lon: f64 = lon
        .trim()
        .parse()
        .map_err(|e| format!("invalid longitude: {e}"))?;
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
        return Err(format!("coordinates out of range: ({lat}, {lon})"));
    }
    Ok((lat, lon))
}
