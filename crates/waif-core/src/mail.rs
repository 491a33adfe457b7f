//! The email-transport capability interface.

/// A fully-composed message descriptor handed to the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
  pub to:      String,
  pub subject: String,
  pub body:    String,
}

/// Email transport boundary.
///
/// `send` is fire-and-forget by contract: implementations return
/// immediately, perform delivery on a detached task, and log failures
/// rather than surface them. Claim success never depends on delivery.
pub trait Mailer: Send + Sync {
  fn send(&self, message: EmailMessage);
}
