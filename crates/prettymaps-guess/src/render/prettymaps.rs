use super::{Config, MapRenderer};
use crate::prelude::*;
use crate::util::process;
use crate::Result;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use std::path::PathBuf;

/// This preset renders only the plotter-friendly outlines, that are
/// unrecognizable as a map
const EXCLUDED_PRESET: &str = "barcelona-plotter";

const PRESETS_SCRIPT: &str = "\
import json, prettymaps
print(json.dumps([str(preset) for preset in prettymaps.presets()['preset']]))
";

const PLOT_SCRIPT: &str = "\
import sys, prettymaps
prettymaps.plot(query=sys.argv[1], preset=sys.argv[2], save_as=sys.argv[3])
";

/// Renders maps by running the `prettymaps` python library in a subprocess
pub(crate) struct Prettymaps {
    config: Config,
}

impl Prettymaps {
    pub(crate) fn new(config: Config) -> Self {
        Self { config }
    }

    fn output_path(&self, now: NaiveDateTime, preset: &str) -> PathBuf {
        self.config.output_dir.join(image_file_name(now, preset))
    }
}

fn image_file_name(now: NaiveDateTime, preset: &str) -> String {
    format!("prettymaps_{}_{preset}.png", now.format("%Y%m%d-%H%M%S"))
}

#[async_trait]
impl MapRenderer for Prettymaps {
    async fn presets(&self) -> Result<Vec<String>> {
        let presets: Vec<String> =
            process::run_json(&self.config.python, &["-c", PRESETS_SCRIPT]).await?;

        let presets = presets
            .into_iter()
            .map(|preset| preset.trim().to_owned())
            .filter(|preset| !preset.contains(EXCLUDED_PRESET))
            .collect();

        debug!(?presets, "Listed prettymaps presets");

        Ok(presets)
    }

    #[instrument(skip(self))]
    async fn render(&self, address: &str, preset: &str) -> Result<PathBuf> {
        let path = self.output_path(chrono::Local::now().naive_local(), preset);

        let path_str = path
            .to_str()
            .fatal_ctx(|| format!("Image path is not valid UTF-8: {path:?}"))?;

        process::run(&self.config.python, &["-c", PLOT_SCRIPT, address, preset, path_str])
            .with_duration_log("Rendered the map")
            .await?;

        // prettymaps doesn't fail if it couldn't save the image
        fs_err::tokio::metadata(&path).await?;

        Ok(path)
    }
}
