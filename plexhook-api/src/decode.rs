use axum::http::{header, HeaderMap};
use base64::alphabet;
use base64::engine::{GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use bytes::Bytes;
use mime::Mime;
use tracing::{debug, warn};

use crate::api::WebhookError;

/// Standard alphabet with canonical padding, accepting non-zero trailing bits in the last symbol.
const BODY_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_allow_trailing_bits(true),
);

/// Decode a base64 request body, ignoring surrounding whitespace and line breaks.
pub fn decode_body(body: &[u8]) -> Result<Bytes, WebhookError> {
    let start = body
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(body.len());
    let end = body
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map_or(start, |last| last + 1);

    let encoded: Vec<u8> = body[start..end]
        .iter()
        .copied()
        .filter(|&b| b != b'\r' && b != b'\n')
        .collect();

    let decoded = BODY_ENGINE.decode(encoded).map_err(|e| {
        warn!("failed to base64 decode body: {}", e);
        WebhookError::BodyDecodingError(e)
    })?;

    debug!(len = decoded.len(), "decoded request body");
    Ok(Bytes::from(decoded))
}

/// Parse the media type out of the request's `Content-Type` header.
pub fn parse_content_type(headers: &HeaderMap) -> Result<Mime, WebhookError> {
    let value = headers
        .get(header::CONTENT_TYPE)
        .ok_or_else(|| WebhookError::ContentTypeError("missing Content-Type header".to_owned()))?
        .to_str()
        .map_err(|e| WebhookError::ContentTypeError(e.to_string()))?;

    value.parse::<Mime>().map_err(|e| {
        warn!("failed to parse content type {:?}: {}", value, e);
        WebhookError::ContentTypeError(e.to_string())
    })
}

/// Boundary of a `multipart/*` media type, `None` for any other media type.
///
/// A multipart type without a boundary yields `Some("")`, which no body can match.
pub fn multipart_boundary(media_type: &Mime) -> Option<String> {
    if media_type.type_() != mime::MULTIPART {
        return None;
    }

    Some(
        media_type
            .get_param(mime::BOUNDARY)
            .map(|boundary| boundary.as_str().to_owned())
            .unwrap_or_default(),
    )
}
