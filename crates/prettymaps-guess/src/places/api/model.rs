//! Declarations of the OpenTripMap JSON API types.
//! See the [API reference](https://opentripmap.io/docs) for details.
use crate::places::{Place, PlaceId, PlacesError};
use crate::{err, Result};
use geo::Point;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub(crate) struct RadiusQuery<'a> {
    pub(crate) lon: f64,
    pub(crate) lat: f64,

    /// Search radius in meters
    pub(crate) radius: u32,

    /// Minimum popularity rating of the places
    pub(crate) rate: u8,

    /// Only places with the attributes sourced from OpenStreetMap
    pub(crate) src_attr: &'a str,

    pub(crate) limit: u32,
    pub(crate) apikey: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RadiusResponse {
    #[serde(default)]
    pub(crate) features: Vec<PlaceFeature>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct PlaceFeature {
    geometry: RawGeometry,
    properties: RawProperties,
}

#[derive(Debug, Clone, Deserialize)]
struct RawGeometry {
    #[serde(rename = "type")]
    kind: String,

    #[serde(default)]
    coordinates: serde_json::Value,
}

#[derive(Debug, Clone, Deserialize)]
struct RawProperties {
    xid: PlaceId,

    #[serde(default)]
    name: String,
}

impl PlaceFeature {
    pub(crate) fn try_into_place(self) -> Result<Place> {
        let RawProperties { xid, name } = self.properties;

        if self.geometry.kind != "Point" {
            return Err(err!(PlacesError::UnexpectedGeometry {
                place: xid,
                kind: self.geometry.kind,
            }));
        }

        let coords: Vec<f64> = serde_json::from_value(self.geometry.coordinates).map_err(|source| {
            err!(PlacesError::MalformedCoordinates {
                place: xid.clone(),
                source: Some(source),
            })
        })?;

        let (lon, lat) = match coords.as_slice() {
            &[lon, lat, ..] => (lon, lat),
            _ => {
                return Err(err!(PlacesError::MalformedCoordinates {
                    place: xid,
                    source: None::<serde_json::Error>,
                }))
            }
        };

        Ok(Place {
            id: xid,
            name,
            point: Point::new(lon, lat),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use expect_test::expect;

    fn feature(json: serde_json::Value) -> Result<Place> {
        serde_json::from_value::<PlaceFeature>(json)
            .unwrap()
            .try_into_place()
    }

    #[test]
    fn parses_radius_response() {
        let response: RadiusResponse = serde_json::from_str(
            r#"{
                "type": "FeatureCollection",
                "features": [{
                    "type": "Feature",
                    "id": "4205271",
                    "geometry": { "type": "Point", "coordinates": [2.2945, 48.85824] },
                    "properties": {
                        "xid": "R1834818",
                        "name": "Tour Eiffel",
                        "dist": 5421.9,
                        "rate": 7,
                        "osm": "relation/1834818",
                        "wikidata": "Q243",
                        "kinds": "architecture,towers,interesting_places"
                    }
                }]
            }"#,
        )
        .unwrap();

        let places: Vec<_> = response
            .features
            .into_iter()
            .map(|feature| feature.try_into_place().unwrap())
            .collect();

        let [place] = places.as_slice() else {
            panic!("Expected exactly one place: {places:?}");
        };

        assert_eq!(place.id.to_string(), "R1834818");
        assert_eq!(place.name, "Tour Eiffel");
        assert_eq!(place.point.x_y(), (2.2945, 48.85824));
    }

    #[test]
    fn rejects_non_point_geometry() {
        let err = feature(serde_json::json!({
            "geometry": { "type": "LineString", "coordinates": [[0, 0], [1, 1]] },
            "properties": { "xid": "W1", "name": "Some road" },
        }))
        .unwrap_err();

        expect!["Place `W1` has `LineString` geometry, but `Point` was expected"]
            .assert_eq(&err.kind().to_string());
    }

    #[test]
    fn rejects_malformed_coordinates() {
        let err = feature(serde_json::json!({
            "geometry": { "type": "Point", "coordinates": [1.0] },
            "properties": { "xid": "N1" },
        }))
        .unwrap_err();

        expect!["Place `N1` has malformed point coordinates"].assert_eq(&err.kind().to_string());
    }
}
