use axum::extract::State;
use axum::http::HeaderMap;
use bytes::Bytes;
use metrics::counter;
use plexhook_common::notification::LibraryItem;
use tracing::{debug, error, info, instrument, warn};

use crate::api::{WebhookError, WebhookResponse};
use crate::decode::{decode_body, multipart_boundary, parse_content_type};
use crate::notifier::Notifier;
use crate::{parts, router};

/// Handle a Plex webhook: announce newly added movies and episodes.
///
/// Only a body that is not base64 (400) or a missing or unparseable content type (415) fail
/// the request. Whatever happens afterwards, including a failed notification, is logged and
/// answered with 200 so Plex does not consider the webhook broken.
#[instrument(skip_all, fields(content_type, parts, payloads))]
pub async fn post(
    State(state): State<router::State>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<WebhookResponse, WebhookError> {
    let decoded = decode_body(&body)?;
    debug!(headers = ?headers, "received webhook");

    let media_type = parse_content_type(&headers)?;
    tracing::Span::current().record("content_type", media_type.essence_str());

    let Some(boundary) = multipart_boundary(&media_type) else {
        debug!("ignoring non-multipart request");
        return Ok(WebhookResponse::default());
    };

    if boundary.is_empty() {
        warn!("multipart request without a boundary, ignoring it");
        return Ok(WebhookResponse::default());
    }

    let walked = parts::read_events(decoded, &boundary, state.thumbnail_dir.as_deref()).await;
    let span = tracing::Span::current();
    span.record("parts", walked.part_count);
    span.record("payloads", walked.events.len());

    for item in walked.events.iter().filter_map(LibraryItem::from_event) {
        notify(state.notifier.as_ref(), &item).await;
    }

    Ok(WebhookResponse::default())
}

async fn notify(notifier: &(dyn Notifier + Send + Sync), item: &LibraryItem) {
    let message = item.to_message();

    match notifier.notify(&message).await {
        Ok(()) => {
            info!("sent notification: {}", message.text);
            counter!("plexhook_notifications_total", "outcome" => "sent", "section" => item.section())
                .increment(1);
        }
        Err(e) => {
            error!("failed to send notification '{}': {}", message.text, e);
            counter!("plexhook_notifications_total", "outcome" => "failed", "section" => item.section())
                .increment(1);
        }
    }
}
