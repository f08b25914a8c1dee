//! Rendering of the map images with [prettymaps](https://github.com/marceloprates/prettymaps).
mod prettymaps;

use crate::prelude::*;
use crate::{fatal, Result};
use async_trait::async_trait;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Deserialize;
use std::convert::Infallible;
use std::path::PathBuf;
use std::str::FromStr;

pub(crate) use self::prettymaps::Prettymaps;

#[derive(Debug, Deserialize)]
pub(crate) struct Config {
    /// Python interpreter with `prettymaps` installed
    #[serde(default = "default_python")]
    pub(crate) python: String,

    /// Directory where the rendered images are saved before the upload
    #[serde(default = "default_output_dir")]
    pub(crate) output_dir: PathBuf,
}

fn default_python() -> String {
    "python3".to_owned()
}

fn default_output_dir() -> PathBuf {
    ".".into()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PresetSelector {
    Random,
    Named(String),
}

impl FromStr for PresetSelector {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "random" => Self::Random,
            _ => Self::Named(s.to_owned()),
        })
    }
}

#[async_trait]
pub(crate) trait MapRenderer: Send + Sync {
    /// Names of the presets that can be used for rendering
    async fn presets(&self) -> Result<Vec<String>>;

    /// Renders the map of the area found by the address into a PNG file
    /// and returns the path to it.
    async fn render(&self, address: &str, preset: &str) -> Result<PathBuf>;
}

/// Resolves the preset name. The list of presets is requested only when
/// a random one has to be picked.
pub(crate) async fn select_preset(
    renderer: &dyn MapRenderer,
    selector: &PresetSelector,
    rng: &mut (impl Rng + Send),
) -> Result<String> {
    let name = match selector {
        PresetSelector::Named(name) => return Ok(name.clone()),
        PresetSelector::Random => {
            let presets = renderer.presets().await?;
            presets
                .choose(rng)
                .cloned()
                .ok_or_else(|| fatal!("No prettymaps presets are available"))?
        }
    };

    debug!(preset = %name, "Picked a random preset");

    Ok(name)
}
