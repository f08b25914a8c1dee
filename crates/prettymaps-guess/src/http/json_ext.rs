use super::HttpClientError;
use crate::prelude::*;
use crate::{err, Result};
use async_trait::async_trait;
use easy_ext::ext;
use reqwest_middleware::RequestBuilder;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Unparsable bodies are logged, but an HTML error page may be huge
const MAX_LOGGED_BODY_CHARS: usize = 500;

#[ext(RequestBuilderJsonExt)]
#[async_trait]
pub(crate) impl RequestBuilder {
    /// Sends the `body` serialized as JSON and parses the JSON response
    async fn send_json<Req, Res>(self, body: &Req) -> Result<Res>
    where
        Req: Serialize + Sync + ?Sized,
        Res: DeserializeOwned,
    {
        self.json(body).fetch_json().await
    }

    async fn fetch_json<Res: DeserializeOwned>(self) -> Result<Res> {
        let bytes = self.read_bytes().await?;
        parse_json(&bytes)
    }
}

pub(crate) fn parse_json<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    let expected = std::any::type_name::<T>();

    serde_json::from_slice(body).map_err(|source| {
        let text = String::from_utf8_lossy(body);
        warn!(
            expected,
            body_len = body.len(),
            body = %text.truncate_with_marker(MAX_LOGGED_BODY_CHARS, "..."),
            "Response body doesn't match the expected JSON shape"
        );
        err!(HttpClientError::UnexpectedResponseJsonShape { expected, source })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use expect_test::expect;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Account {
        id: String,
        #[serde(default)]
        bot: bool,
    }

    #[test]
    fn parses_matching_body() {
        let account: Account = parse_json(br#"{ "id": "42", "username": "bot" }"#).unwrap();

        assert_eq!(
            account,
            Account {
                id: "42".to_owned(),
                bot: false
            }
        );
    }

    #[test_log::test]
    fn reports_shape_mismatch() {
        let err = parse_json::<Account>(br#"{ "error": "The access token is invalid" }"#)
            .unwrap_err();

        expect![[r#"
            Response body doesn't match the JSON shape of `prettymaps_guess::http::json_ext::tests::Account`"#]]
        .assert_eq(&err.kind().to_string());

        let chain = err.display_chain().to_string();
        assert!(chain.contains("missing field `id`"), "{chain}");
    }

    #[test_log::test]
    fn non_utf8_body_is_an_error() {
        let err = parse_json::<Vec<u32>>(&[0xff, 0xfe, b'[']).unwrap_err();

        assert!(
            matches!(
                err.kind(),
                crate::error::ErrorKind::HttpClient {
                    source: HttpClientError::UnexpectedResponseJsonShape { .. }
                }
            ),
            "{}",
            err.display_chain()
        );
    }
}
