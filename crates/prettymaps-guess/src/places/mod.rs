//! Search of the points of interest around a random point of a country
//! using the [OpenTripMap](https://opentripmap.io) places API.
mod api;

use crate::country::Country;
use crate::prelude::*;
use crate::{err, http, Result};
use async_trait::async_trait;
use derivative::Derivative;
use geo::Point;
use rand::Rng;
use serde::Deserialize;
use std::future::Future;
use thiserror::Error;
use url::Url;

pub(crate) use api::PlaceFeature;

/// Every sampled point may be in a desert or in the middle of a lake, so
/// there may be no places around it. This bounds the number of points
/// sampled for a single place.
pub(crate) const MAX_PLACE_SEARCH_ATTEMPTS: usize = 100;

#[derive(Derivative, Deserialize)]
#[derivative(Debug)]
pub(crate) struct Config {
    #[derivative(Debug = "ignore")]
    pub(crate) api_key: String,

    #[serde(default = "default_url")]
    pub(crate) url: Url,
}

fn default_url() -> Url {
    "https://api.opentripmap.com/0.1/en/places/radius"
        .parse()
        .unwrap_or_else(|err| panic!("BUG: invalid default OpenTripMap URL: {err}"))
}

pub(crate) fn client(config: Config, http: http::Client) -> impl PlacesApi {
    api::Client::new(config, http)
}

/// OpenTripMap's `xid` of the place
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, derive_more::Display)]
#[serde(transparent)]
pub(crate) struct PlaceId(String);

#[derive(Debug, Clone)]
pub(crate) struct Place {
    pub(crate) id: PlaceId,
    pub(crate) name: String,
    pub(crate) point: Point<f64>,
}

#[derive(Debug, Clone)]
pub(crate) struct PlacesQuery {
    pub(crate) point: Point<f64>,
    pub(crate) radius_m: u32,
    pub(crate) min_rate: u8,
    pub(crate) limit: u32,
}

#[async_trait]
pub(crate) trait PlacesApi: Send + Sync {
    /// Returns the raw places around the point. An empty list is not an error.
    async fn places_around(&self, query: &PlacesQuery) -> Result<Vec<PlaceFeature>>;
}

/// Parameters of the search that stay the same for every sampled point
#[derive(Debug, Clone)]
pub(crate) struct PlaceSearch {
    pub(crate) radius_km: u32,
    pub(crate) min_rate: u8,
    pub(crate) limit: u32,
}

impl PlaceSearch {
    pub(crate) fn new(radius_km: u32) -> Self {
        Self {
            radius_km,
            min_rate: 3,
            limit: 50,
        }
    }

    fn query(&self, point: Point<f64>) -> PlacesQuery {
        PlacesQuery {
            point,
            radius_m: self.radius_km.saturating_mul(1000),
            min_rate: self.min_rate,
            limit: self.limit,
        }
    }
}

/// Samples random points inside of the country until there is at least one
/// place around the point, and passes a random one of them to `accept`.
/// The place may be rejected by `accept` returning `None`, in which case the
/// search goes on. Empty results and rejected places share the same budget
/// of [`MAX_PLACE_SEARCH_ATTEMPTS`] sampled points.
#[instrument(skip_all, fields(country = %country.name))]
pub(crate) async fn find_place<T, F, Fut>(
    api: &dyn PlacesApi,
    country: &Country,
    search: &PlaceSearch,
    rng: &mut (impl Rng + Send),
    mut accept: F,
) -> Result<T>
where
    F: FnMut(Place) -> Fut,
    Fut: Future<Output = Result<Option<T>>>,
{
    let mut rejected = 0;

    for attempt in 1..=MAX_PLACE_SEARCH_ATTEMPTS {
        let point = country.sample_point(rng)?;
        let mut features = api.places_around(&search.query(point)).await?;

        if features.is_empty() {
            debug!(attempt, ?point, "No places found around the point, retrying");
            continue;
        }

        let feature = features.swap_remove(rng.gen_range(0..features.len()));
        let place = feature.try_into_place()?;

        debug!(attempt, ?place, "Found a place");

        if let Some(accepted) = accept(place).await? {
            return Ok(accepted);
        }

        rejected += 1;
    }

    if rejected > 0 {
        return Err(err!(PlacesError::NoDistinctPlace {
            country: &country.name,
            attempts: MAX_PLACE_SEARCH_ATTEMPTS,
        }));
    }

    Err(err!(PlacesError::NotFound {
        country: &country.name,
        attempts: MAX_PLACE_SEARCH_ATTEMPTS,
    }))
}

#[derive(Debug, Error)]
pub(crate) enum PlacesError {
    #[error("Place `{place}` has `{kind}` geometry, but `Point` was expected")]
    UnexpectedGeometry { place: PlaceId, kind: String },

    #[error("Place `{place}` has malformed point coordinates")]
    MalformedCoordinates {
        place: PlaceId,
        source: Option<serde_json::Error>,
    },

    #[error("No places were found in `{country}` around {attempts} random points")]
    NotFound { country: String, attempts: usize },

    #[error(
        "Couldn't find a place in `{country}` distinct from the already \
        picked ones around {attempts} random points"
    )]
    NoDistinctPlace { country: String, attempts: usize },
}
