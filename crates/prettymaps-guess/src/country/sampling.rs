use super::{Country, CountryError};
use crate::prelude::*;
use crate::{err, Result};
use geo::{BoundingRect, Contains, Point};
use rand::Rng;

/// Thin or mostly empty boundaries may need lots of draws, but this many
/// failures in a row means the boundary has no area to speak of.
pub(crate) const MAX_SAMPLING_ATTEMPTS: usize = 10_000;

impl Country {
    /// Draws a uniformly distributed point that lies strictly inside of the
    /// country's boundary using rejection sampling within its bounding box.
    pub(crate) fn sample_point(&self, rng: &mut impl Rng) -> Result<Point<f64>> {
        let bbox = self.boundary.bounding_rect().ok_or_else(|| {
            err!(CountryError::EmptyBoundary {
                country: &self.name
            })
        })?;

        let (min, max) = (bbox.min(), bbox.max());

        for attempt in 1..=MAX_SAMPLING_ATTEMPTS {
            let point = Point::new(rng.gen_range(min.x..=max.x), rng.gen_range(min.y..=max.y));

            if self.boundary.contains(&point) {
                trace!(attempt, ?point, "Sampled a point inside of the country");
                return Ok(point);
            }
        }

        Err(err!(CountryError::SamplingExhausted {
            country: &self.name,
            attempts: MAX_SAMPLING_ATTEMPTS,
        }))
    }
}
