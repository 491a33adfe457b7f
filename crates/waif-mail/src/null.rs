//! [`NullMailer`] — a transport that logs and discards.

use waif_core::mail::{EmailMessage, Mailer};

/// Used when no SMTP relay is configured. The claim flow proceeds
/// normally; the notification is visible in the logs only.
#[derive(Debug, Clone, Default)]
pub struct NullMailer;

impl Mailer for NullMailer {
  fn send(&self, message: EmailMessage) {
    tracing::info!(
      to = %message.to,
      subject = %message.subject,
      "mail transport disabled; dropping claim notification"
    );
  }
}
