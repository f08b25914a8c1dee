use crate::country::CountrySelector;
use crate::game::GameParams;
use crate::render::PresetSelector;
use crate::{err, Result};
use clap::Parser;
use std::ops::RangeInclusive;
use thiserror::Error;

const NB_PICKS_RANGE: RangeInclusive<i64> = 2..=4;

/// The answer is scheduled one hour before the poll expires, and Mastodon
/// requires the scheduled time to be in the future. The upper bound is
/// the maximum poll duration that Mastodon allows by default.
const POLL_HOURS_RANGE: RangeInclusive<i64> = 2..=720;

/// Posts a "guess the place" game to Mastodon: a map of a random place in a
/// country rendered with prettymaps, and a poll with possible answers.
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Args {
    /// Country inside which random places are picked (`random` to pick any country)
    #[arg(short, long, default_value = "random")]
    country: CountrySelector,

    /// Number of available picks (between 2 and 4)
    #[arg(
        short,
        long,
        visible_alias = "nb_picks",
        default_value_t = 3,
        allow_negative_numbers = true
    )]
    nb_picks: i64,

    /// Prettymaps preset to use (`random` to pick any available preset)
    #[arg(short, long, default_value = "default")]
    preset: PresetSelector,

    /// Radius (km) used to search for a place around a randomly sampled point
    #[arg(short, long, default_value_t = 50)]
    radius: u32,

    /// After how many hours the poll expires
    #[arg(short = 'H', long, default_value_t = 24, allow_negative_numbers = true)]
    hours: i64,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Checks the values that can't be validated by the parser itself.
    pub fn validate(&self) -> Result<GameParams> {
        if !NB_PICKS_RANGE.contains(&self.nb_picks) {
            return Err(err!(ArgsError::NbPicksOutOfRange {
                actual: self.nb_picks
            }));
        }

        if !POLL_HOURS_RANGE.contains(&self.hours) {
            return Err(err!(ArgsError::PollHoursOutOfRange { actual: self.hours }));
        }

        if self.radius == 0 {
            return Err(err!(ArgsError::ZeroRadius));
        }

        // Ranges are checked above, so the conversions are lossless
        Ok(GameParams {
            country: self.country.clone(),
            nb_picks: self.nb_picks as usize,
            preset: self.preset.clone(),
            radius_km: self.radius,
            poll_hours: self.hours as u32,
        })
    }
}

/// Exit code for the error returned by the parser. Clap's own convention
/// of exiting with 2 on usage errors is replaced with 1, the same code as for
/// any other failure. Help and version requests are not failures.
pub fn parse_error_exit_code(err: &clap::Error) -> u8 {
    if err.use_stderr() {
        1
    } else {
        0
    }
}

#[derive(Debug, Error)]
pub(crate) enum ArgsError {
    #[error(
        "Number of picks must be between {} and {}, but got {actual}",
        NB_PICKS_RANGE.start(),
        NB_PICKS_RANGE.end()
    )]
    NbPicksOutOfRange { actual: i64 },

    #[error(
        "Poll duration must be between {} and {} hours, but got {actual}",
        POLL_HOURS_RANGE.start(),
        POLL_HOURS_RANGE.end()
    )]
    PollHoursOutOfRange { actual: i64 },

    #[error("Search radius must be greater than zero")]
    ZeroRadius,
}
