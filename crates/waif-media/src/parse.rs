//! `data:` URI parsing.
//!
//! Clients submit images as `data:<media-type>;base64,<payload>` strings,
//! the shape browsers produce from `FileReader.readAsDataURL`.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64;

use crate::{Error, Result};

/// Media types accepted for report images, with their file extensions.
const ACCEPTED: &[(&str, &str)] = &[
  ("image/png", "png"),
  ("image/jpeg", "jpg"),
  ("image/gif", "gif"),
  ("image/webp", "webp"),
];

/// A decoded image payload.
#[derive(Debug, Clone)]
pub struct DecodedImage {
  pub media_type: String,
  pub extension:  &'static str,
  pub bytes:      Vec<u8>,
}

/// Parse and decode a `data:` URI.
pub fn parse_data_uri(payload: &str) -> Result<DecodedImage> {
  let rest = payload
    .strip_prefix("data:")
    .ok_or_else(|| Error::MalformedPayload("missing data: scheme".to_string()))?;

  let (header, data) = rest.split_once(',').ok_or_else(|| {
    Error::MalformedPayload("missing payload separator".to_string())
  })?;

  let media_type = header.strip_suffix(";base64").ok_or_else(|| {
    Error::MalformedPayload("payload is not base64-encoded".to_string())
  })?;

  let extension = ACCEPTED
    .iter()
    .find(|(accepted, _)| *accepted == media_type)
    .map(|(_, ext)| *ext)
    .ok_or_else(|| Error::UnsupportedMediaType(media_type.to_string()))?;

  let bytes = B64.decode(data.trim())?;
  if bytes.is_empty() {
    return Err(Error::MalformedPayload("empty image payload".to_string()));
  }

  Ok(DecodedImage { media_type: media_type.to_string(), extension, bytes })
}
