use crate::{country, geocoding, mastodon, places, render, Result};
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Configuration of all the components of the bot read from the environment.
/// It is loaded once at startup and then passed down to each of them.
#[derive(Debug)]
pub struct Config {
    pub(crate) mastodon: mastodon::Config,
    pub(crate) places: places::Config,
    pub(crate) geocoding: geocoding::Config,
    pub(crate) render: render::Config,
    pub(crate) country: country::Config,
}

impl Config {
    pub(crate) fn from_vars(vars: impl IntoIterator<Item = (String, String)>) -> Result<Config> {
        let vars: Vec<_> = vars.into_iter().collect();
        Ok(Self {
            mastodon: from_vars("MASTODON_", vars.clone())?,
            places: from_vars("OPENTRIPMAP_", vars.clone())?,
            geocoding: from_vars("NOMINATIM_", vars.clone())?,
            render: from_vars("PRETTYMAPS_", vars.clone())?,
            country: from_vars("COUNTRIES_", vars)?,
        })
    }
}

pub(crate) fn from_env<T: DeserializeOwned>(prefix: &'static str) -> Result<T> {
    from_vars(prefix, std::env::vars())
}

fn from_vars<T: DeserializeOwned>(
    prefix: &'static str,
    vars: impl IntoIterator<Item = (String, String)>,
) -> Result<T> {
    envy::prefixed(prefix).from_iter(vars).map_err(|source| {
        crate::err!(ConfigError::Load {
            prefix,
            ty: std::any::type_name::<T>(),
            source,
        })
    })
}

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("Couldn't load config `{ty}` from environment variables with prefix `{prefix}`")]
    Load {
        prefix: &'static str,
        ty: &'static str,
        source: envy::Error,
    },
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::util::prelude::*;

    pub(crate) fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    pub(crate) const REQUIRED: &[(&str, &str)] = &[
        ("MASTODON_INSTANCE", "https://botsin.space"),
        ("MASTODON_ACCESS_TOKEN", "secret-token"),
        ("OPENTRIPMAP_API_KEY", "secret-key"),
    ];

    #[test]
    fn loads_required_vars_with_defaults() {
        let config = Config::from_vars(vars(REQUIRED)).unwrap();

        assert_eq!(config.mastodon.instance.as_str(), "https://botsin.space/");
        assert_eq!(config.places.api_key, "secret-key");
        assert_eq!(
            config.places.url.as_str(),
            "https://api.opentripmap.com/0.1/en/places/radius"
        );
        assert_eq!(
            config.geocoding.url.as_str(),
            "https://nominatim.openstreetmap.org/"
        );
        assert_eq!(config.render.python, "python3");
        assert_eq!(
            config.country.geojson.to_str(),
            Some("world_countries.geojson")
        );
    }

    #[test]
    fn secrets_are_not_displayed() {
        let config = Config::from_vars(vars(REQUIRED)).unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("secret"), "{debug}");
    }

    #[test]
    fn missing_required_var() {
        for missing in REQUIRED {
            let vars = REQUIRED.iter().filter(|(k, _)| k != &missing.0).copied();
            let err = Config::from_vars(vars.map(|(k, v)| (k.to_owned(), v.to_owned())))
                .unwrap_err();

            assert!(
                matches!(err.kind(), ErrorKind::Config { .. }),
                "{}",
                err.display_chain()
            );
        }
    }

    #[test]
    fn missing_token_message() {
        let err = Config::from_vars(vars(&REQUIRED[..1])).unwrap_err();
        let message = err.display_chain().to_string();

        assert!(message.contains("MASTODON_"), "{message}");
        assert!(message.contains("access_token"), "{message}");
    }
}
