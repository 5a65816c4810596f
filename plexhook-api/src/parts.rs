use std::path::Path;

use bytes::Bytes;
use futures::stream;
use metrics::counter;
use multer::Multipart;
use plexhook_common::plex::PlexEvent;
use tracing::{debug, warn};

/// Multipart field carrying the item's poster image.
pub const THUMBNAIL_PART: &str = "thumb";
/// Multipart field carrying the JSON event.
pub const PAYLOAD_PART: &str = "payload";

const THUMBNAIL_FILE: &str = "thumb.jpg";

/// What a walk over a multipart body found.
#[derive(Debug, Default)]
pub struct MultipartEvents {
    /// Events parsed from `payload` parts, in body order.
    pub events: Vec<PlexEvent>,
    /// Parts read before the body ended or broke, whatever their name.
    pub part_count: usize,
}

/// Walk the parts of a multipart body and collect every event found in a `payload` part.
///
/// Nothing here fails the request: a `payload` that is not a valid event is skipped, and a
/// framing error stops the walk but keeps the events read so far. `thumb` parts are written to
/// `thumbnail_dir` when one is given, and dropped otherwise.
pub async fn read_events(
    body: Bytes,
    boundary: &str,
    thumbnail_dir: Option<&Path>,
) -> MultipartEvents {
    let body_stream = stream::once(async move { Ok::<Bytes, std::io::Error>(body) });
    let mut multipart = Multipart::new(body_stream, boundary);

    let mut events = Vec::new();
    let mut part_count = 0;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                warn!("multipart parsing failed after {} parts: {}", part_count, e);
                counter!("plexhook_multipart_errors_total").increment(1);
                break;
            }
        };
        part_count += 1;

        let field_name = field.name().unwrap_or_default().to_owned();
        let field_data = match field.bytes().await {
            Ok(data) => data,
            Err(e) => {
                warn!("failed to read multipart field '{}': {}", field_name, e);
                counter!("plexhook_multipart_errors_total").increment(1);
                break;
            }
        };

        debug!(
            "processing multipart field: {} (part #{}, {} bytes)",
            field_name,
            part_count,
            field_data.len()
        );

        match field_name.as_str() {
            THUMBNAIL_PART => {
                if let Some(dir) = thumbnail_dir {
                    save_thumbnail(dir, &field_data).await;
                }
            }
            PAYLOAD_PART => match PlexEvent::from_slice(&field_data) {
                Ok(event) => {
                    debug!(
                        event = %event.event,
                        kind = %event.metadata.kind,
                        grandparent_title = %event.metadata.grandparent_title,
                        parent_title = %event.metadata.parent_title,
                        title = %event.metadata.title,
                        "parsed plex payload"
                    );
                    counter!("plexhook_payloads_received_total", "event" => event.event.to_string())
                        .increment(1);
                    events.push(event);
                }
                Err(e) => {
                    warn!("skipping malformed payload part: {}", e);
                    counter!("plexhook_payloads_invalid_total").increment(1);
                }
            },
            other => debug!("ignoring unknown multipart field: {}", other),
        }
    }

    MultipartEvents { events, part_count }
}

async fn save_thumbnail(dir: &Path, data: &[u8]) {
    if let Err(e) = tokio::fs::create_dir_all(dir).await {
        warn!("failed to create thumbnail directory {:?}: {}", dir, e);
        return;
    }

    let path = dir.join(THUMBNAIL_FILE);
    match tokio::fs::write(&path, data).await {
        Ok(()) => {
            debug!("saved thumbnail to {:?}", path);
            counter!("plexhook_thumbnails_saved_total").increment(1);
        }
        Err(e) => warn!("failed to save thumbnail to {:?}: {}", path, e),
    }
}

#[cfg(test)]
mod tests {
    use plexhook_common::plex::{MetadataType, PlexEventKind};

    use super::*;
    use crate::test_utils::{
        episode_payload, movie_payload, multipart_body, TestPart, TEST_BOUNDARY,
    };

    #[tokio::test]
    async fn reads_payload_part() {
        let body = multipart_body(&[TestPart::json(PAYLOAD_PART, &movie_payload("Inception"))]);

        let events = read_events(body, TEST_BOUNDARY, None).await.events;

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event, PlexEventKind::LibraryNew);
        assert_eq!(events[0].metadata.kind, MetadataType::Movie);
        assert_eq!(events[0].metadata.title, "Inception");
    }

    #[tokio::test]
    async fn skips_malformed_payload_and_continues() {
        let body = multipart_body(&[
            TestPart::json(PAYLOAD_PART, "{\"event\": \"library.new\", "),
            TestPart::json("unexpected", "{}"),
            TestPart::json(PAYLOAD_PART, &episode_payload("Show", "Season 1", "Pilot")),
        ]);

        let walked = read_events(body, TEST_BOUNDARY, None).await;
        assert_eq!(walked.part_count, 3);

        let events = walked.events;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].metadata.kind, MetadataType::Episode);
        assert_eq!(events[0].metadata.title, "Pilot");
    }

    #[tokio::test]
    async fn saves_thumbnail_when_configured() {
        let dir = tempfile::tempdir().unwrap();
        let thumbnail_dir = dir.path().join("thumbs");
        let body = multipart_body(&[
            TestPart::json(PAYLOAD_PART, &movie_payload("Inception")),
            TestPart::jpeg(THUMBNAIL_PART, b"\xff\xd8\xff\xe0jpeg"),
        ]);

        let events = read_events(body, TEST_BOUNDARY, Some(thumbnail_dir.as_path()))
            .await
            .events;

        assert_eq!(events.len(), 1);
        let saved = std::fs::read(thumbnail_dir.join(THUMBNAIL_FILE)).unwrap();
        assert_eq!(saved, b"\xff\xd8\xff\xe0jpeg");
    }

    #[tokio::test]
    async fn thumbnail_write_failure_keeps_events() {
        let dir = tempfile::tempdir().unwrap();
        let not_a_dir = dir.path().join("thumbs");
        std::fs::write(&not_a_dir, b"already a file").unwrap();
        let body = multipart_body(&[
            TestPart::jpeg(THUMBNAIL_PART, b"\xff\xd8\xff\xe0jpeg"),
            TestPart::json(PAYLOAD_PART, &movie_payload("Inception")),
        ]);

        let walked = read_events(body, TEST_BOUNDARY, Some(not_a_dir.as_path())).await;

        assert_eq!(walked.part_count, 2);
        assert_eq!(walked.events.len(), 1);
        assert_eq!(walked.events[0].metadata.title, "Inception");
        assert_eq!(std::fs::read(&not_a_dir).unwrap(), b"already a file");
    }

    #[tokio::test]
    async fn drops_thumbnail_by_default() {
        let body = multipart_body(&[TestPart::jpeg(THUMBNAIL_PART, b"\xff\xd8\xff\xe0jpeg")]);

        let events = read_events(body, TEST_BOUNDARY, None).await.events;

        assert!(events.is_empty());
    }

    #[tokio::test]
    async fn keeps_events_read_before_framing_error() {
        let mut body = multipart_body(&[TestPart::json(PAYLOAD_PART, &movie_payload("Inception"))])
            .to_vec();
        // Chop the closing delimiter off and start a part that never ends.
        body.truncate(body.len() - (TEST_BOUNDARY.len() + 6));
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"payload\"\r\n\r\n{{\"event\"",
                TEST_BOUNDARY
            )
            .as_bytes(),
        );

        let events = read_events(Bytes::from(body), TEST_BOUNDARY, None).await.events;

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].metadata.title, "Inception");
    }

    #[tokio::test]
    async fn garbage_body_yields_nothing() {
        let walked = read_events(Bytes::from_static(b"not multipart"), TEST_BOUNDARY, None).await;
        assert!(walked.events.is_empty());
        assert_eq!(walked.part_count, 0);
    }
}
