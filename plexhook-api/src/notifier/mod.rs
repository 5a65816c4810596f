use async_trait::async_trait;
use plexhook_common::slack::SlackMessage;
use thiserror::Error;

pub mod print;
pub mod slack;

/// Enumeration of errors that can occur while delivering a notification.
#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("failed to serialize notification: {0}")]
    SerializationError(#[from] serde_json::Error),
    #[error("notification request failed: {0}")]
    RequestError(#[from] reqwest::Error),
    #[error("non-ok response returned from slack ({status}): {body}")]
    UnexpectedResponse { status: u16, body: String },
}

/// Delivers a message to wherever notifications go. Delivery is attempted once.
#[async_trait]
pub trait Notifier {
    async fn notify(&self, message: &SlackMessage) -> Result<(), NotifyError>;
}
