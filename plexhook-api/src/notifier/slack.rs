use std::time;

use async_trait::async_trait;
use metrics::histogram;
use plexhook_common::slack::{SlackMessage, SLACK_OK_RESPONSE};
use reqwest::header;
use tracing::debug;
use url::Url;

use crate::notifier::{Notifier, NotifyError};

/// Posts notifications to a Slack incoming webhook.
pub struct SlackNotifier {
    /// The client used for HTTP requests.
    client: reqwest::Client,
    /// The incoming webhook URL messages are posted to.
    url: Url,
}

impl SlackNotifier {
    pub fn new(url: Url, request_timeout: time::Duration) -> Result<Self, reqwest::Error> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent("plexhook")
            .timeout(request_timeout)
            .build()?;

        Ok(Self { client, url })
    }
}

#[async_trait]
impl Notifier for SlackNotifier {
    /// Slack answers an accepted message with a plain `ok` body; anything else is an error,
    /// whatever the status code.
    async fn notify(&self, message: &SlackMessage) -> Result<(), NotifyError> {
        let body = serde_json::to_vec(message)?;
        debug!(
            "sending message to slack: {}",
            String::from_utf8_lossy(&body)
        );

        let start = time::Instant::now();
        let response = self.client.post(self.url.clone()).body(body).send().await;
        histogram!("plexhook_notification_duration_seconds").record(start.elapsed().as_secs_f64());

        let response = response?;
        let status = response.status().as_u16();
        let response_body = response.text().await?;

        if response_body != SLACK_OK_RESPONSE {
            return Err(NotifyError::UnexpectedResponse {
                status,
                body: response_body,
            });
        }

        Ok(())
    }
}
