mod geojson;
mod sampling;

use crate::prelude::*;
use crate::{err, Result};
use geo::MultiPolygon;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Deserialize;
use std::convert::Infallible;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Deserialize)]
pub(crate) struct Config {
    /// Path to the GeoJSON feature collection with the boundaries of countries
    #[serde(default = "default_geojson")]
    pub(crate) geojson: PathBuf,
}

fn default_geojson() -> PathBuf {
    "world_countries.geojson".into()
}

/// Which country to play the game in
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum CountrySelector {
    Random,

    /// Case-insensitive name of the country
    Named(String),
}

impl FromStr for CountrySelector {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "random" => Self::Random,
            _ => Self::Named(s.to_owned()),
        })
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Country {
    pub(crate) name: String,
    pub(crate) boundary: MultiPolygon<f64>,
}

#[derive(Debug, Clone)]
pub(crate) struct CountryDataset {
    countries: Vec<Country>,
}

impl CountryDataset {
    pub(crate) async fn load(config: &Config) -> Result<Self> {
        let json = fs_err::tokio::read_to_string(&config.geojson).await?;

        crate::util::tokio::spawn_blocking(move || Self::from_json(&json)).await
    }

    pub(crate) fn from_json(json: &str) -> Result<Self> {
        let collection: geojson::RawFeatureCollection = serde_json::from_str(json)
            .map_err(|source| err!(CountryError::Deserialize { source }))?;

        if collection.kind != geojson::FEATURE_COLLECTION {
            return Err(err!(CountryError::NotFeatureCollection {
                actual: collection.kind
            }));
        }

        let countries = collection
            .features
            .into_iter()
            .map(geojson::RawFeature::try_into_country)
            .collect::<Result<Vec<_>>>()?;

        debug!(countries = countries.len(), "Loaded countries dataset");

        Ok(Self { countries })
    }

    pub(crate) fn select(&self, selector: &CountrySelector, rng: &mut impl Rng) -> Result<&Country> {
        match selector {
            CountrySelector::Random => self
                .countries
                .choose(rng)
                .ok_or_else(|| err!(CountryError::EmptyDataset)),
            CountrySelector::Named(name) => self.find_by_name(name),
        }
    }

    fn find_by_name(&self, name: &str) -> Result<&Country> {
        let needle = name.to_uppercase();
        self.countries
            .iter()
            .find(|country| country.name.to_uppercase() == needle)
            .ok_or_else(|| err!(CountryError::NotFound { name }))
    }
}

#[derive(Debug, Error)]
pub(crate) enum CountryError {
    #[error("Failed to parse the countries dataset")]
    Deserialize { source: serde_json::Error },

    #[error(
        "The countries dataset must be a `{}`, but its type is `{actual}`",
        geojson::FEATURE_COLLECTION
    )]
    NotFeatureCollection { actual: String },

    #[error("Malformed geometry of the country `{country}`: {reason}")]
    MalformedGeometry {
        country: String,
        reason: &'static str,
    },

    #[error("The countries dataset contains no countries")]
    EmptyDataset,

    #[error("Country `{name}` was not found in the dataset")]
    NotFound { name: String },

    #[error("The boundary of the country `{country}` is empty")]
    EmptyBoundary { country: String },

    #[error("Couldn't sample a point inside of `{country}` after {attempts} attempts")]
    SamplingExhausted { country: String, attempts: usize },
}
