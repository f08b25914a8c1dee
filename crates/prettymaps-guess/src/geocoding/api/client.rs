use super::model::{ReverseQuery, ReverseResponse};
use crate::geocoding::{Config, Geocoder, ResolvedPlace};
use crate::prelude::*;
use crate::{http, Result};
use async_trait::async_trait;
use geo::Point;

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
impl Geocoder for Client {
    async fn reverse(&self, point: Point<f64>) -> Result<ResolvedPlace> {
        let url = self.config.url.with_segments(["reverse"]);

        let response: ReverseResponse = self
            .http
            .get(url)
            .query(&ReverseQuery::geojson(point))
            .fetch_json()
            .await?;

        let place = response.try_into_resolved_place(point)?;

        debug!(display_name = %place.display_name, address = ?place.address, "Resolved the address");

        Ok(place)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test_log::test(tokio::test)]
    #[ignore]
    async fn manual_sandbox() {
        let config = crate::config::from_env("NOMINATIM_").unwrap();
        let client = Client::new(config, http::create_client().unwrap());

        let place = client.reverse(Point::new(2.2945, 48.85824)).await.unwrap();

        eprintln!("{place:#?}");
    }
}
