//! Reverse geocoding of places with [Nominatim](https://nominatim.org).
mod api;

use crate::http;
use crate::Result;
use async_trait::async_trait;
use geo::Point;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

#[derive(Debug, Deserialize)]
pub(crate) struct Config {
    #[serde(default = "default_url")]
    pub(crate) url: Url,
}

fn default_url() -> Url {
    "https://nominatim.openstreetmap.org"
        .parse()
        .unwrap_or_else(|err| panic!("BUG: invalid default Nominatim URL: {err}"))
}

pub(crate) fn client(config: Config, http: http::Client) -> impl Geocoder {
    api::Client::new(config, http)
}

#[derive(Debug, Clone)]
pub(crate) struct ResolvedPlace {
    /// Full human-readable address, e.g.
    /// `Tour Eiffel, 5, Avenue Anatole France, Paris, France`
    pub(crate) display_name: String,
    pub(crate) address: Address,
}

/// Only the parts of the address that we care about. Nominatim returns
/// just the ones that are known for the place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub(crate) struct Address {
    pub(crate) municipality: Option<String>,
    pub(crate) town: Option<String>,
    pub(crate) state: Option<String>,
    pub(crate) region: Option<String>,
}

#[async_trait]
pub(crate) trait Geocoder: Send + Sync {
    async fn reverse(&self, point: Point<f64>) -> Result<ResolvedPlace>;
}

#[derive(Debug, Error)]
pub(crate) enum GeocodingError {
    #[error(
        "Expected exactly one feature in the reverse geocoding response \
        for ({lon}, {lat}), but got {actual}"
    )]
    UnexpectedFeatureCount { lon: f64, lat: f64, actual: usize },
}
