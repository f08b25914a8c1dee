use crate::geocoding::Address;
use crate::prelude::*;

/// Mastodon's default limit for the length of a poll option
pub(crate) const MAX_POLL_OPTION_LENGTH: usize = 50;

const UNKNOWN_LOCATION: &str = "somewhere";

/// Label of the place in the poll in the form of `{name}, {city}, {region}`.
pub(crate) fn poll_option(name: &str, address: &Address) -> String {
    let city = address
        .municipality
        .as_deref()
        .or(address.town.as_deref())
        .unwrap_or(UNKNOWN_LOCATION);

    let region = address
        .state
        .as_deref()
        .or(address.region.as_deref())
        .unwrap_or(UNKNOWN_LOCATION);

    format!("{name}, {city}, {region}").truncate_with_marker(MAX_POLL_OPTION_LENGTH, "..")
}
