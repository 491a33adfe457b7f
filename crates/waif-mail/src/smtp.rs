//! [`SmtpMailer`] — lettre-backed SMTP delivery.

use std::sync::Arc;

use lettre::{
  Message, SmtpTransport, Transport,
  transport::smtp::authentication::Credentials,
};
use waif_core::mail::{EmailMessage, Mailer};

use crate::Result;

/// SMTP relay settings, typically deserialised from server config.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
  pub host:     String,
  pub username: String,
  pub password: String,
  /// Mailbox used as the `From` header,
  /// e.g. `"Lost & Found <lostfound@example.edu>"`.
  pub from:     String,
}

/// Delivers claim notifications over SMTP.
///
/// The blocking transport runs on a `spawn_blocking` task so `send`
/// returns before the relay is contacted; the claim response never waits
/// on the wire.
#[derive(Clone)]
pub struct SmtpMailer {
  transport: Arc<SmtpTransport>,
  from:      String,
}

impl SmtpMailer {
  pub fn new(config: &SmtpConfig) -> Result<Self> {
    let transport = SmtpTransport::relay(&config.host)?
      .credentials(Credentials::new(
        config.username.clone(),
        config.password.clone(),
      ))
      .build();
    Ok(Self { transport: Arc::new(transport), from: config.from.clone() })
  }

  fn compose(&self, message: &EmailMessage) -> Result<Message> {
    Ok(
      Message::builder()
        .from(self.from.parse()?)
        .to(message.to.parse()?)
        .subject(message.subject.clone())
        .body(message.body.clone())?,
    )
  }
}

impl Mailer for SmtpMailer {
  fn send(&self, message: EmailMessage) {
    let composed = match self.compose(&message) {
      Ok(m) => m,
      Err(e) => {
        tracing::error!(
          to = %message.to,
          error = %e,
          "failed to compose claim notification"
        );
        return;
      }
    };

    let transport = Arc::clone(&self.transport);
    let to = message.to;
    tokio::task::spawn_blocking(move || match transport.send(&composed) {
      Ok(_) => tracing::info!(%to, "claim notification sent"),
      Err(e) => {
        tracing::error!(%to, error = %e, "failed to send claim notification");
      }
    });
  }
}
