use crate::geocoding::{Address, GeocodingError, ResolvedPlace};
use crate::{err, Result};
use geo::Point;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub(crate) struct ReverseQuery {
    pub(crate) lon: f64,
    pub(crate) lat: f64,
    pub(crate) format: &'static str,
}

impl ReverseQuery {
    pub(crate) fn geojson(point: Point<f64>) -> Self {
        Self {
            lon: point.x(),
            lat: point.y(),
            format: "geojson",
        }
    }
}

/// Nominatim responds with `200 OK` and `{ "error": "Unable to geocode" }`
/// when there is nothing at the point, so `features` are optional.
#[derive(Debug, Deserialize)]
pub(crate) struct ReverseResponse {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    properties: Properties,
}

#[derive(Debug, Deserialize)]
struct Properties {
    display_name: String,

    #[serde(default)]
    address: Address,
}

impl ReverseResponse {
    pub(crate) fn try_into_resolved_place(self, point: Point<f64>) -> Result<ResolvedPlace> {
        let actual = self.features.len();
        let mut features = self.features.into_iter();

        let (Some(feature), None) = (features.next(), features.next()) else {
            return Err(err!(GeocodingError::UnexpectedFeatureCount {
                lon: point.x(),
                lat: point.y(),
                actual,
            }));
        };

        let Properties {
            display_name,
            address,
        } = feature.properties;

        Ok(ResolvedPlace {
            display_name,
            address,
        })
    }
}
