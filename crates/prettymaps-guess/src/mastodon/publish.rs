use super::{MediaUpload, NewPoll, NewStatus, Publisher, ScheduledStatus, Status, Visibility};
use crate::prelude::*;
use crate::Result;
use chrono::{DateTime, Duration, SubsecRound, Utc};
use std::path::PathBuf;

const LANGUAGE: &str = "en";
const POLL_TEXT: &str = "Which place is this ?";
const ANSWER_SPOILER_TEXT: &str = "✅ Correct answer";

fn image_text(country: &str) -> String {
    format!(
        "🗺 Which place is this ?\n\
        \n\
        📍 Clue: this place is in {country}\n\
        \n\
        👇 You can answer in the poll which is in the first reply 👇\n\
        \n\
        #prettymaps"
    )
}

fn image_description(country: &str) -> String {
    format!("A map of a place somewhere in {country} generated with Prettymaps")
}

fn answer_text(answer: &str) -> String {
    format!("The correct answer is : {answer}")
}

#[derive(Debug, Clone)]
pub(crate) struct GamePost {
    pub(crate) country: String,

    /// Rendered map image. It is removed once the image status is posted.
    pub(crate) image: PathBuf,

    /// Poll options in the order they are shown in the poll
    pub(crate) options: Vec<String>,
    pub(crate) answer: String,
    pub(crate) poll_hours: u32,
}

#[derive(Debug)]
pub(crate) struct PublishedGame {
    pub(crate) image: Status,
    pub(crate) poll: Status,
    pub(crate) answer: ScheduledStatus,
}

/// Posts the image, replies to it with the poll, and schedules the reply
/// with the answer to the poll one hour before the poll expires.
///
/// Already published statuses are not deleted if any of the later steps fail.
#[instrument(skip_all, fields(country = %post.country))]
pub(crate) async fn publish_game(
    publisher: &dyn Publisher,
    post: &GamePost,
    now: DateTime<Utc>,
) -> Result<PublishedGame> {
    let image = post_image(publisher, post).await;

    // The image is not needed anymore even if the upload failed
    let removed = fs_err::tokio::remove_file(&post.image).await;
    let image = image?;
    removed?;

    info!(
        id = %image.id,
        account = %image.account.acct,
        url = ?image.url,
        "Posted the image"
    );

    let poll = NewStatus {
        status: POLL_TEXT.to_owned(),
        media_ids: vec![],
        in_reply_to_id: Some(image.id.clone()),
        poll: Some(NewPoll {
            options: post.options.clone(),
            expires_in: u64::from(post.poll_hours) * 3600,
            multiple: false,
            hide_totals: false,
        }),
        spoiler_text: None,
        visibility: Visibility::Unlisted,
        language: LANGUAGE,
    };

    let poll = publisher.post_status(poll).await?;

    info!(id = %poll.id, "Posted the poll");

    let answer = NewStatus {
        status: answer_text(&post.answer),
        media_ids: vec![],
        in_reply_to_id: Some(poll.id.clone()),
        poll: None,
        spoiler_text: Some(ANSWER_SPOILER_TEXT.to_owned()),
        visibility: Visibility::Unlisted,
        language: LANGUAGE,
    };

    let scheduled_at = now.trunc_subsecs(0) + Duration::hours(i64::from(post.poll_hours) - 1);

    let answer = publisher.schedule_status(answer, scheduled_at).await?;

    info!(
        id = %answer.id,
        scheduled_at = %answer.scheduled_at,
        "Scheduled the answer"
    );

    Ok(PublishedGame {
        image,
        poll,
        answer,
    })
}

async fn post_image(publisher: &dyn Publisher, post: &GamePost) -> Result<Status> {
    let media = MediaUpload {
        path: post.image.clone(),
        mime: "image/png",
        description: image_description(&post.country),
    };

    let media_id = publisher
        .upload_media(media)
        .with_duration_log("Uploaded the image")
        .await?;

    let status = NewStatus {
        status: image_text(&post.country),
        media_ids: vec![media_id],
        in_reply_to_id: None,
        poll: None,
        spoiler_text: None,
        visibility: Visibility::Public,
        language: LANGUAGE,
    };

    publisher.post_status(status).await
}
