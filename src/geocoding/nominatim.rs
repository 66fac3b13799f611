use std::fmt::Write as _;
use std::num::NonZeroU32;
use std::time::Duration;

use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use isahc::prelude::*;
use isahc::{HttpClient, Request};

use super::{Coordinates, GeocodeError, Geocoder};

const SEARCH_URL: &str = "https://nominatim.openstreetmap.org/search";
/// Nominatim usage policy requires identifying the client on every request.
const USER_AGENT: &str = "helpmenow/0.1 (emergency collection point lookup)";
const TIMEOUT: Duration = Duration::from_secs(15);

/// Backend for the OpenStreetMap Nominatim search API.
///
/// Throttled to one request per second, per the service's usage policy.
pub struct Backend {
    client: HttpClient,
    limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,
}

impl Backend {
    pub fn new() -> Result<Self, GeocodeError> {
        let client = HttpClient::new().map_err(|e| GeocodeError::Network(e.to_string()))?;
        Ok(Self {
            client,
            limiter: RateLimiter::direct(Quota::per_second(NonZeroU32::MIN)),
        })
    }

    async fn search(&self, query: String) -> Result<Coordinates, GeocodeError> {
        while self.limiter.check().is_err() {
            async_io::Timer::after(Duration::from_millis(250)).await;
        }

        let url = format!("{SEARCH_URL}?q={}&format=json", percent_encode(&query));
        tracing::debug!(query = %query, "geocoding");

        let request = Request::get(&url)
            .timeout(TIMEOUT)
            .header("User-Agent", USER_AGENT)
            .body(())
            .map_err(|e| GeocodeError::Network(e.to_string()))?;
        let mut response = self
            .client
            .send_async(request)
            .await
            .map_err(|e| GeocodeError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(GeocodeError::Status(response.status().as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| GeocodeError::Network(e.to_string()))?;
        parse_search_response(&body)
    }
}

impl Geocoder for Backend {
    fn geocode(
        &self,
        query: String,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Coordinates, GeocodeError>> + Send + '_>,
    > {
        Box::pin(self.search(query))
    }
}

#[derive(serde::Deserialize)]
struct SearchResult {
    lat: String,
    lon: String,
    display_name: String,
}

/// First-result policy: Nominatim orders candidates by relevance and the
/// assistant has no further signal to disambiguate with.
fn parse_search_response(body: &str) -> Result<Coordinates, GeocodeError> {
    let results: Vec<SearchResult> = serde_json::from_str(body)
        .map_err(|e| GeocodeError::Malformed(format!("search response: {e}")))?;
    let Some(first) = results.into_iter().next() else {
        return Err(GeocodeError::NotFound);
    };
    let lat = first
        .lat
        .parse::<f64>()
        .map_err(|e| GeocodeError::Malformed(format!("invalid lat: {e}")))?;
    let lon = first
        .lon
        .parse::<f64>()
        .map_err(|e| GeocodeError::Malformed(format!("invalid lon: {e}")))?;
    Coordinates::new(lat, lon, first.display_name)
}

/// Percent-encode a string for use in a URL query parameter.
fn percent_encode(s: &str) -> String {
    let mut out = String::with_capacity(s.len() * 2);
    for byte in s.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char);
            }
            b' ' => out.push('+'),
            _ => {
                let _ = write!(out, "%{byte:02X}");
            }
        }
    }
    out
}
