//! Subset of GeoJSON used by the country boundaries dataset. Only the
//! `ADMIN` property and (multi)polygon geometries are understood.
use super::{Country, CountryError};
use crate::{err, Result};
use geo::{Coord, LineString, MultiPolygon, Polygon};
use serde::Deserialize;

pub(super) const FEATURE_COLLECTION: &str = "FeatureCollection";

#[derive(Debug, Deserialize)]
pub(super) struct RawFeatureCollection {
    #[serde(rename = "type")]
    pub(super) kind: String,

    #[serde(default)]
    pub(super) features: Vec<RawFeature>,
}

#[derive(Debug, Deserialize)]
pub(super) struct RawFeature {
    properties: RawProperties,
    geometry: RawGeometry,
}

#[derive(Debug, Deserialize)]
struct RawProperties {
    #[serde(rename = "ADMIN")]
    admin: String,
}

/// Positions may carry an altitude, so they are not fixed-size arrays
type RawPosition = Vec<f64>;
type RawRing = Vec<RawPosition>;
type RawPolygon = Vec<RawRing>;

#[derive(Debug, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
enum RawGeometry {
    Polygon(RawPolygon),
    MultiPolygon(Vec<RawPolygon>),
}

impl RawFeature {
    pub(super) fn try_into_country(self) -> Result<Country> {
        let name = self.properties.admin;

        let polygons = match self.geometry {
            RawGeometry::Polygon(polygon) => vec![polygon],
            RawGeometry::MultiPolygon(polygons) => polygons,
        };

        let boundary = polygons
            .into_iter()
            .map(|polygon| convert_polygon(&name, polygon))
            .collect::<Result<Vec<_>>>()?;

        Ok(Country {
            name,
            boundary: MultiPolygon::new(boundary),
        })
    }
}

fn convert_polygon(country: &str, polygon: RawPolygon) -> Result<Polygon<f64>> {
    let mut rings = polygon
        .into_iter()
        .map(|ring| convert_ring(country, ring));

    let exterior = rings.next().transpose()?.ok_or_else(|| {
        err!(CountryError::MalformedGeometry {
            country,
            reason: "polygon has no exterior ring",
        })
    })?;

    let interiors = rings.collect::<Result<_>>()?;

    Ok(Polygon::new(exterior, interiors))
}

fn convert_ring(country: &str, ring: RawRing) -> Result<LineString<f64>> {
    ring.into_iter()
        .map(|position| match position[..] {
            [x, y, ..] => Ok(Coord { x, y }),
            _ => Err(err!(CountryError::MalformedGeometry {
                country,
                reason: "position has less than two coordinates",
            })),
        })
        .collect()
}
