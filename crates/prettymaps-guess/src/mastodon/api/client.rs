use super::model::*;
use crate::mastodon::{Config, MastodonError, Publisher};
use crate::prelude::*;
use crate::{err, http, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::multipart::{Form, Part};
use reqwest::Method;
use reqwest_middleware::RequestBuilder;

/// Header that makes the server ignore a repeated request with the same key,
/// so that a retried request doesn't create a duplicate status
const IDEMPOTENCY_KEY: &str = "Idempotency-Key";

pub(crate) struct Client {
    http: http::Client,

    /// Multipart bodies can't be cloned to be retried
    http_without_retries: http::Client,
    config: Config,
}

impl Client {
    pub(crate) fn new(config: Config, http: http::Client, http_without_retries: http::Client) -> Self {
        Self {
            http,
            http_without_retries,
            config,
        }
    }

    fn request(&self, http: &http::Client, method: Method, path: &[&str]) -> RequestBuilder {
        let url = self.config.instance.with_segments(path);
        http.request(method, url)
            .bearer_auth(&self.config.access_token)
    }

    fn create_status(&self) -> RequestBuilder {
        self.request(&self.http, Method::POST, &["api", "v1", "statuses"])
            .header(IDEMPOTENCY_KEY, nanoid::nanoid!())
    }
}

#[async_trait]
impl Publisher for Client {
    async fn upload_media(&self, media: MediaUpload) -> Result<MediaId> {
        let bytes = fs_err::tokio::read(&media.path).await?;

        let file_name = media
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image.png".to_owned());

        let file = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(media.mime)
            .fatal_ctx(|| format!("Invalid media MIME type: {}", media.mime))?;

        let form = Form::new()
            .part("file", file)
            .text("description", media.description);

        let attachment: MediaAttachment = self
            .request(&self.http_without_retries, Method::POST, &["api", "v2", "media"])
            .multipart(form)
            .fetch_json()
            .await?;

        debug!(id = %attachment.id, url = ?attachment.url, "Uploaded media");

        Ok(attachment.id)
    }

    async fn post_status(&self, status: NewStatus) -> Result<Status> {
        let created: Status = self.create_status().send_json(&status).await?;

        debug!(
            id = %created.id,
            visibility = %status.visibility,
            "Posted a status"
        );

        Ok(created)
    }

    async fn schedule_status(
        &self,
        status: NewStatus,
        scheduled_at: DateTime<Utc>,
    ) -> Result<ScheduledStatus> {
        let request = ScheduleRequest {
            status: &status,
            scheduled_at,
        };

        let response: ScheduleResponse = self.create_status().send_json(&request).await?;

        match response {
            ScheduleResponse::Scheduled(scheduled) => {
                debug!(
                    id = %scheduled.id,
                    visibility = %status.visibility,
                    %scheduled_at,
                    "Scheduled a status"
                );
                Ok(scheduled)
            }
            ScheduleResponse::Published(status) => {
                Err(err!(MastodonError::NotScheduled { status: status.id }))
            }
        }
    }
}
