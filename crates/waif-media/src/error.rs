//! Error type for `waif-media`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("malformed data URI: {0}")]
  MalformedPayload(String),

  #[error("unsupported media type: {0}")]
  UnsupportedMediaType(String),

  #[error("base64 decode error: {0}")]
  Base64(#[from] base64::DecodeError),

  #[error("i/o error: {0}")]
  Io(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl From<Error> for waif_core::media::MediaError {
  fn from(e: Error) -> Self {
    match e {
      Error::Io(_) => Self::Backend(e.to_string()),
      other => Self::InvalidPayload(other.to_string()),
    }
  }
}
