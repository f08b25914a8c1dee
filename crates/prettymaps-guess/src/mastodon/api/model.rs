//! Subset of the [Mastodon API](https://docs.joinmastodon.org/methods/statuses/)
//! entities used by the bot.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use url::Url;

#[derive(derive_more::Display, Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub(crate) struct StatusId(pub(crate) String);

#[derive(derive_more::Display, Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub(crate) struct MediaId(pub(crate) String);

#[derive(Debug, Clone)]
pub(crate) struct MediaUpload {
    pub(crate) path: PathBuf,
    pub(crate) mime: &'static str,

    /// Alt text of the media
    pub(crate) description: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct MediaAttachment {
    pub(crate) id: MediaId,

    /// Absent while the media is still being processed
    #[serde(default)]
    pub(crate) url: Option<Url>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub(crate) enum Visibility {
    Public,
    Unlisted,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct NewStatus {
    pub(crate) status: String,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub(crate) media_ids: Vec<MediaId>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) in_reply_to_id: Option<StatusId>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) poll: Option<NewPoll>,

    /// Content warning that hides the text of the status
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) spoiler_text: Option<String>,

    pub(crate) visibility: Visibility,

    /// ISO 639 language code
    pub(crate) language: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct NewPoll {
    pub(crate) options: Vec<String>,

    /// Duration of the poll in seconds
    pub(crate) expires_in: u64,
    pub(crate) multiple: bool,
    pub(crate) hide_totals: bool,
}

#[derive(Debug, Serialize)]
pub(super) struct ScheduleRequest<'a> {
    #[serde(flatten)]
    pub(super) status: &'a NewStatus,
    pub(super) scheduled_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Status {
    pub(crate) id: StatusId,

    /// Web page of the status
    #[serde(default)]
    pub(crate) url: Option<Url>,

    pub(crate) account: Account,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Account {
    /// `username` for local accounts, `username@domain` for remote ones
    pub(crate) acct: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ScheduledStatus {
    pub(crate) id: String,
    pub(crate) scheduled_at: DateTime<Utc>,
}

/// Mastodon publishes the status immediately if the scheduled time is less
/// than 5 minutes in the future.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum ScheduleResponse {
    Scheduled(ScheduledStatus),
    Published(Status),
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use expect_test::expect;

    fn answer() -> NewStatus {
        NewStatus {
            status: "The correct answer is : Place A, Town, Region".to_owned(),
            media_ids: vec![],
            in_reply_to_id: Some(StatusId("110".to_owned())),
            poll: None,
            spoiler_text: Some("✅ Correct answer".to_owned()),
            visibility: Visibility::Unlisted,
            language: "en",
        }
    }

    #[test]
    fn serializes_scheduled_status() {
        let status = answer();
        let request = ScheduleRequest {
            status: &status,
            scheduled_at: Utc.with_ymd_and_hms(2023, 4, 5, 6, 7, 8).unwrap(),
        };

        expect![[r#"
            {
              "status": "The correct answer is : Place A, Town, Region",
              "in_reply_to_id": "110",
              "spoiler_text": "✅ Correct answer",
              "visibility": "unlisted",
              "language": "en",
              "scheduled_at": "2023-04-05T06:07:08Z"
            }"#]]
        .assert_eq(&serde_json::to_string_pretty(&request).unwrap());
    }

    #[test]
    fn serializes_poll() {
        let status = NewStatus {
            status: "Which place is this ?".to_owned(),
            poll: Some(NewPoll {
                options: vec!["A".to_owned(), "B".to_owned()],
                expires_in: 86400,
                multiple: false,
                hide_totals: false,
            }),
            spoiler_text: None,
            ..answer()
        };

        expect![[r#"
            {
              "status": "Which place is this ?",
              "in_reply_to_id": "110",
              "poll": {
                "options": [
                  "A",
                  "B"
                ],
                "expires_in": 86400,
                "multiple": false,
                "hide_totals": false
              },
              "visibility": "unlisted",
              "language": "en"
            }"#]]
        .assert_eq(&serde_json::to_string_pretty(&status).unwrap());
    }

    #[test]
    fn visibility_is_displayed_as_serialized() {
        for visibility in [Visibility::Public, Visibility::Unlisted] {
            assert_eq!(
                serde_json::to_value(visibility).unwrap(),
                visibility.to_string(),
            );
        }
        expect!["unlisted"].assert_eq(&Visibility::Unlisted.to_string());
    }

    #[test]
    fn schedule_response_variants() {
        let scheduled: ScheduleResponse = serde_json::from_str(
            r#"{
                "id": "3221",
                "scheduled_at": "2019-12-05T12:33:01.000Z",
                "params": { "text": "test content", "visibility": "unlisted" },
                "media_attachments": []
            }"#,
        )
        .unwrap();

        assert!(
            matches!(&scheduled, ScheduleResponse::Scheduled(status) if status.id == "3221"),
            "{scheduled:?}"
        );

        let published: ScheduleResponse = serde_json::from_str(
            r#"{
                "id": "103254962155278888",
                "created_at": "2019-12-05T11:34:47.196Z",
                "url": "https://botsin.space/@prettymapsguess/103254962155278888",
                "account": { "id": "1", "username": "prettymapsguess", "acct": "prettymapsguess" }
            }"#,
        )
        .unwrap();

        assert!(
            matches!(&published, ScheduleResponse::Published(status) if status.account.acct == "prettymapsguess"),
            "{published:?}"
        );
    }
}
