mod basic_ext;
mod json_ext;

use crate::prelude::*;
use crate::Result;
use async_trait::async_trait;
use reqwest_middleware::RequestBuilder;
use reqwest_retry::policies::ExponentialBackoff;
use reqwest_retry::RetryTransientMiddleware;
use std::time::Duration;

pub(crate) mod prelude {
    pub(crate) use super::basic_ext::RequestBuilderBasicExt as _;
    pub(crate) use super::json_ext::RequestBuilderJsonExt as _;
}

pub(crate) type Client = reqwest_middleware::ClientWithMiddleware;

const USER_AGENT: &str = concat!(
    "PrettymapsGuessBot/",
    env!("CARGO_PKG_VERSION"),
    " (https://github.com/Veetaha/prettymaps-guess)",
);

/// Creates an HTTP client that retries transient failures with an exponential
/// backoff. The requests sent with it must have a body that can be cloned.
pub(crate) fn create_client() -> Result<Client> {
    // Retry exponentially increasing intervals between attempts.
    let retry_policy = ExponentialBackoff::builder()
        .backoff_exponent(2)
        .retry_bounds(Duration::from_millis(100), Duration::from_secs(3))
        .build_with_total_retry_duration(Duration::from_secs(30));

    Ok(client_builder()?
        .with(RetryTransientMiddleware::new_with_policy(retry_policy))
        .with(InnermostObservingMiddleware)
        .with_init(set_user_agent)
        .build())
}

/// Same as [`create_client`], but without retries. It is required for
/// streaming request bodies (e.g. multipart uploads), that can't be cloned
/// to be sent again.
pub(crate) fn create_client_without_retries() -> Result<Client> {
    Ok(client_builder()?
        .with(InnermostObservingMiddleware)
        .with_init(set_user_agent)
        .build())
}

fn client_builder() -> Result<reqwest_middleware::ClientBuilder> {
    let client = reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(30))
        .build()
        .fatal_ctx(|| "Failed to create an HTTP client")?;

    Ok(reqwest_middleware::ClientBuilder::new(client).with(OutermostObservingMiddleware))
}

fn set_user_agent(request_builder: RequestBuilder) -> RequestBuilder {
    // Nominatim's usage policy requires an identifying user agent
    request_builder.header(reqwest::header::USER_AGENT, USER_AGENT)
}

struct OutermostObservingMiddleware;

#[async_trait]
impl reqwest_middleware::Middleware for OutermostObservingMiddleware {
    async fn handle(
        &self,
        request: reqwest::Request,
        extensions: &mut task_local_extensions::Extensions,
        next: reqwest_middleware::Next<'_>,
    ) -> reqwest_middleware::Result<reqwest::Response> {
        let span = info_span!(
            "request",
            method = %request.method(),
            url = %redacted_url(request.url()),
        );

        let (result, duration) = next
            .run(request, extensions)
            .instrument(span.clone())
            .with_duration()
            .await;

        if let Err(err) = &result {
            span.in_scope(|| {
                error!(
                    duration = tracing_duration(duration),
                    err = tracing_err(err),
                    "Network request failed after all attempts"
                );
            });
        }

        result
    }
}

struct InnermostObservingMiddleware;

#[async_trait]
impl reqwest_middleware::Middleware for InnermostObservingMiddleware {
    async fn handle(
        &self,
        request: reqwest::Request,
        extensions: &mut task_local_extensions::Extensions,
        next: reqwest_middleware::Next<'_>,
    ) -> reqwest_middleware::Result<reqwest::Response> {
        let (result, duration) = next.run(request, extensions).with_duration().await;

        let duration = tracing_duration(duration);

        let response = match &result {
            Ok(response) => response,
            Err(err) => {
                warn!(duration, err = tracing_err(err), "Network request failed");
                return result;
            }
        };

        let status = response.status();

        let Err(err) = response.error_for_status_ref() else {
            info!(duration, %status, "Network request succeeded");
            return result;
        };

        warn!(
            err = tracing_err(&err),
            duration,
            %status,
            "Network request failed (error status)"
        );

        result
    }
}

/// Removes the values of query parameters that carry credentials, so that
/// they don't end up in the logs.
fn redacted_url(url: &url::Url) -> url::Url {
    const SECRET_PARAMS: &[&str] = &["apikey", "access_token"];

    if !url.query_pairs().any(|(key, _)| SECRET_PARAMS.contains(&&*key)) {
        return url.clone();
    }

    let mut redacted = url.clone();
    redacted.query_pairs_mut().clear().extend_pairs(url.query_pairs().map(|(key, value)| {
        if SECRET_PARAMS.contains(&&*key) {
            (key, "***".into())
        } else {
            (key, value)
        }
    }));
    redacted
}

/// Errors at the layer of the HTTP API
#[derive(Debug, thiserror::Error)]
pub(crate) enum HttpClientError {
    #[error("HTTP request failed")]
    Request { source: reqwest_middleware::Error },

    #[error("Failed to read HTTP response")]
    ReadPayload { source: reqwest::Error },

    #[error("HTTP request has failed (HTTP status code: {status}):\n{body}")]
    BadResponseStatusCode {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Response body doesn't match the JSON shape of `{expected}`")]
    UnexpectedResponseJsonShape {
        expected: &'static str,
        source: serde_json::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use expect_test::{expect, Expect};

    #[track_caller]
    fn assert_redacted(url: &str, expected: Expect) {
        let url: url::Url = url.parse().unwrap();
        expected.assert_eq(redacted_url(&url).as_str());
    }

    #[test]
    fn secrets_are_redacted_from_urls() {
        use assert_redacted as test;

        test(
            "https://nominatim.openstreetmap.org/reverse?lon=1.5&lat=2&format=geojson",
            expect!["https://nominatim.openstreetmap.org/reverse?lon=1.5&lat=2&format=geojson"],
        );
        test(
            "https://api.opentripmap.com/0.1/en/places/radius?lon=1&apikey=secret&limit=50",
            expect!["https://api.opentripmap.com/0.1/en/places/radius?lon=1&apikey=***&limit=50"],
        );
    }

    #[test_log::test(tokio::test)]
    #[ignore]
    async fn manual_sandbox() {
        let http = create_client().unwrap();
        let response = http
            .get("https://nominatim.openstreetmap.org/status?format=json")
            .send()
            .await
            .unwrap();

        dbg!(response.status());
    }
}
