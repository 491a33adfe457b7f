//! Error taxonomy for `waif-core`.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error("report not found: {0}")]
  ReportNotFound(Uuid),

  #[error("user not found: {0}")]
  UserNotFound(String),

  #[error("not allowed to modify this report")]
  Forbidden,

  #[error("report {0} is already claimed")]
  AlreadyClaimed(Uuid),

  #[error("cannot claim a report you filed yourself")]
  SelfClaim,

  #[error("invalid input: {0}")]
  InvalidInput(String),

  #[error("upstream failure: {0}")]
  Upstream(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Wrap an infrastructure failure (database, image store, transport).
  pub fn upstream<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Upstream(Box::new(e))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
