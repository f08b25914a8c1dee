//! Publishing of the game to a [Mastodon](https://joinmastodon.org) account.
mod api;
pub(crate) mod publish;

use crate::{http, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use derivative::Derivative;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

pub(crate) use api::{
    Account, MediaId, MediaUpload, NewPoll, NewStatus, ScheduledStatus, Status, StatusId,
    Visibility,
};
pub(crate) use publish::{publish_game, GamePost, PublishedGame};

#[derive(Derivative, Deserialize)]
#[derivative(Debug)]
pub(crate) struct Config {
    /// Base URL of the Mastodon instance, e.g. `https://botsin.space`
    pub(crate) instance: Url,

    #[derivative(Debug = "ignore")]
    pub(crate) access_token: String,
}

pub(crate) fn client(
    config: Config,
    http: http::Client,
    http_without_retries: http::Client,
) -> impl Publisher {
    api::Client::new(config, http, http_without_retries)
}

#[async_trait]
pub(crate) trait Publisher: Send + Sync {
    async fn upload_media(&self, media: MediaUpload) -> Result<MediaId>;

    async fn post_status(&self, status: NewStatus) -> Result<Status>;

    async fn schedule_status(
        &self,
        status: NewStatus,
        scheduled_at: DateTime<Utc>,
    ) -> Result<ScheduledStatus>;
}

#[derive(Debug, Error)]
pub(crate) enum MastodonError {
    #[error(
        "The status was expected to be scheduled, but it was published \
        immediately with id `{status}`"
    )]
    NotScheduled { status: StatusId },
}
