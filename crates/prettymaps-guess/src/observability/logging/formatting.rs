use crate::util::prelude::*;
use std::fmt;
use std::time::Duration;

/// Records the error with the messages of all of its sources, so that a
/// single log line says what failed and why.
#[must_use]
pub fn tracing_err<E>(err: &E) -> impl tracing::Value + '_
where
    E: std::error::Error + ?Sized,
{
    tracing::field::display(err.display_chain())
}

/// Records the duration in the unit that fits it best: `µs` for the time of
/// local operations, `ms` for network requests and `s` for renders.
pub(crate) fn tracing_duration(duration: Duration) -> impl tracing::Value {
    tracing::field::display(HumanDuration(duration))
}

struct HumanDuration(Duration);

impl fmt::Display for HumanDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let duration = self.0;

        if duration < Duration::from_millis(1) {
            return write!(f, "{}µs", duration.as_micros());
        }

        if duration < Duration::from_secs(1) {
            return write!(f, "{:.1}ms", duration.as_secs_f64() * 1000.0);
        }

        write!(f, "{:.2}s", duration.as_secs_f64())
    }
}
