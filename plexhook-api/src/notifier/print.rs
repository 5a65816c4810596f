use async_trait::async_trait;
use plexhook_common::slack::SlackMessage;
use tracing::info;

use crate::notifier::{Notifier, NotifyError};

/// Logs notifications instead of sending them, for local development.
pub struct PrintNotifier {}

#[async_trait]
impl Notifier for PrintNotifier {
    async fn notify(&self, message: &SlackMessage) -> Result<(), NotifyError> {
        let body = serde_json::to_string(message)?;
        info!(text = %message.text, "notification: {}", body);

        Ok(())
    }
}
