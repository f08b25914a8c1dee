use crate::http;
use crate::places::api::model::*;
use crate::places::{Config, PlacesApi, PlacesQuery};
use crate::prelude::*;
use crate::Result;
use async_trait::async_trait;

/// Only places with attributes taken from OpenStreetMap have names and
/// addresses that Nominatim can make sense of.
const SOURCE_ATTRIBUTION: &str = "osm";

pub(crate) struct Client {
    http: http::Client,
    config: Config,
}

impl Client {
    pub(crate) fn new(config: Config, http: http::Client) -> Self {
        Self { http, config }
    }
}

#[async_trait]
impl PlacesApi for Client {
    async fn places_around(&self, query: &PlacesQuery) -> Result<Vec<PlaceFeature>> {
        let query = RadiusQuery {
            lon: query.point.x(),
            lat: query.point.y(),
            radius: query.radius_m,
            rate: query.min_rate,
            src_attr: SOURCE_ATTRIBUTION,
            limit: query.limit,
            apikey: &self.config.api_key,
        };

        let response: RadiusResponse = self
            .http
            .get(self.config.url.clone())
            .query(&query)
            .fetch_json()
            .await?;

        debug!(places = response.features.len(), "Received places from OpenTripMap");

        Ok(response.features)
    }
}
