//! Coordinate Resolver
//!
//! Turns a free-text location into a latitude/longitude pair through the
//! Nominatim search API.
//!
//! # API Reference
//! - Endpoint: `{base}/search?q={location}&format=json&limit=1`
//! - Documentation: https://nominatim.org/release-docs/latest/api/Search/
//! - A User-Agent identifying the client is required by the usage policy
//!
//! Failures (timeout, network, HTTP status, no match) all collapse to `None`.
//! No retry, no backoff, no rate limiting: one attempt per call.

use async_trait::async_trait;
use cmap_common::Coordinates;
use reqwest::{header, Client};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

/// Fixed client identifier sent to the geocoding service
pub const GEOCODER_USER_AGENT: &str = "community_mapper";

/// Bound on each lookup
pub const GEOCODER_TIMEOUT: Duration = Duration::from_secs(10);

/// Resolves a free-text location to coordinates
///
/// `None` covers both "not found" and "lookup failed"; callers cannot tell
/// the two apart.
#[async_trait]
pub trait CoordinateResolver: Send + Sync {
    async fn resolve(&self, location: &str) -> Option<Coordinates>;
}

/// Nominatim geocoding client
pub struct NominatimClient {
    http_client: Client,
    base_url: String,
}

/// One search hit; Nominatim returns coordinates as strings
#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
}

impl NominatimClient {
    /// Create a client against `base_url` (e.g. `https://nominatim.openstreetmap.org`)
    pub fn new(base_url: impl Into<String>) -> Result<Self, reqwest::Error> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_static(GEOCODER_USER_AGENT),
        );

        let http_client = Client::builder()
            .timeout(GEOCODER_TIMEOUT)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    async fn search(&self, location: &str) -> Result<Option<Coordinates>, reqwest::Error> {
        let url = format!("{}/search", self.base_url);

        let places: Vec<NominatimPlace> = self
            .http_client
            .get(&url)
            .query(&[("q", location), ("format", "json"), ("limit", "1")])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(places.first().and_then(parse_place))
    }
}

#[async_trait]
impl CoordinateResolver for NominatimClient {
    async fn resolve(&self, location: &str) -> Option<Coordinates> {
        debug!(location = %location, "Geocoding location");

        match self.search(location).await {
            Ok(Some(coords)) => {
                debug!(
                    location = %location,
                    latitude = coords.latitude,
                    longitude = coords.longitude,
                    "Geocoded location"
                );
                Some(coords)
            }
            Ok(None) => {
                warn!(location = %location, "No geocoding match for location");
                None
            }
            Err(e) if e.is_timeout() => {
                warn!(location = %location, "Geocoding timed out after {:?}", GEOCODER_TIMEOUT);
                None
            }
            Err(e) => {
                warn!(location = %location, error = %e, "Geocoding request failed");
                None
            }
        }
    }
}

fn parse_place(place: &NominatimPlace) -> Option<Coordinates> {
    let latitude = place.lat.trim().parse::<f64>().ok().filter(|v| v.is_finite())?;
    let longitude = place.lon.trim().parse::<f64>().ok().filter(|v| v.is_finite())?;
    Some(Coordinates::new(latitude, longitude))
}
