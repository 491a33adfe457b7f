//! The image-ingestion capability interface.
//!
//! Implementations convert client-supplied payloads into durable retrieval
//! URLs before a report touches the store. `waif-media` ships the on-disk
//! implementation; tests inject fakes.

use async_trait::async_trait;
use thiserror::Error;

/// Why a payload could not be ingested.
///
/// The distinction matters at the operation boundary: a malformed payload
/// is the caller's fault, a backend failure is not.
#[derive(Debug, Error)]
pub enum MediaError {
  #[error("invalid image payload: {0}")]
  InvalidPayload(String),

  #[error("image store failure: {0}")]
  Backend(String),
}

/// Binary object store boundary: payload in, durable URL out.
#[async_trait]
pub trait ImageStore: Send + Sync {
  /// Ingest one raw payload and return its durable retrieval URL.
  async fn put(&self, payload: &str) -> Result<String, MediaError>;
}
