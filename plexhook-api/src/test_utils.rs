use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use plexhook_common::slack::SlackMessage;
use serde_json::json;

use crate::notifier::{Notifier, NotifyError};

pub const TEST_BOUNDARY: &str = "plexhook-test-boundary";

pub struct TestPart {
    name: &'static str,
    filename: Option<&'static str>,
    content_type: &'static str,
    data: Vec<u8>,
}

impl TestPart {
    pub fn json(name: &'static str, data: &str) -> Self {
        Self {
            name,
            filename: None,
            content_type: "application/json",
            data: data.as_bytes().to_vec(),
        }
    }

    pub fn jpeg(name: &'static str, data: &[u8]) -> Self {
        Self {
            name,
            filename: Some("image.jpg"),
            content_type: "image/jpeg",
            data: data.to_vec(),
        }
    }
}

/// Frame parts as a multipart/form-data body delimited by `TEST_BOUNDARY`.
pub fn multipart_body(parts: &[TestPart]) -> Bytes {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", TEST_BOUNDARY).as_bytes());
        match part.filename {
            Some(filename) => body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                    part.name, filename
                )
                .as_bytes(),
            ),
            None => body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{}\"\r\n", part.name).as_bytes(),
            ),
        }
        body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", part.content_type).as_bytes());
        body.extend_from_slice(&part.data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", TEST_BOUNDARY).as_bytes());

    Bytes::from(body)
}

pub fn plex_payload(event: &str, kind: &str, metadata: serde_json::Value) -> String {
    let mut metadata = metadata;
    metadata["type"] = json!(kind);

    json!({
        "event": event,
        "user": true,
        "owner": true,
        "Account": {"id": 1, "thumb": "https://plex.tv/users/1/avatar", "title": "admin"},
        "Server": {"title": "living-room", "uuid": "54664a3d8acc39983675640ec9ce00b70af9cc36"},
        "Player": {"local": true, "publicAddress": "10.0.0.5", "title": "Plex Web", "uuid": "r6yfkdnfggbh2bdnvkffwbms"},
        "Metadata": metadata,
    })
    .to_string()
}

pub fn movie_payload(title: &str) -> String {
    plex_payload(
        "library.new",
        "movie",
        json!({"librarySectionType": "movie", "title": title, "year": 2010}),
    )
}

pub fn episode_payload(show: &str, season: &str, title: &str) -> String {
    plex_payload(
        "library.new",
        "episode",
        json!({
            "librarySectionType": "show",
            "title": title,
            "parentTitle": season,
            "grandparentTitle": show,
            "index": 1,
            "parentIndex": 1
        }),
    )
}

/// Records every message it is asked to deliver, optionally failing each delivery.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    messages: Arc<Mutex<Vec<SlackMessage>>>,
    fail: bool,
}

impl RecordingNotifier {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn messages(&self) -> Vec<SlackMessage> {
        self.messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, message: &SlackMessage) -> Result<(), NotifyError> {
        self.messages.lock().unwrap().push(message.clone());

        if self.fail {
            return Err(NotifyError::UnexpectedResponse {
                status: 500,
                body: "invalid_payload".to_owned(),
            });
        }
        Ok(())
    }
}
