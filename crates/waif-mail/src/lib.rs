//! Email transport implementations for Waif.
//!
//! [`SmtpMailer`] delivers over SMTP via `lettre`; [`NullMailer`] logs and
//! discards. Both honour the fire-and-forget `Mailer` contract: `send`
//! returns immediately and delivery failures are logged, never surfaced.

mod null;
mod smtp;

pub mod error;

pub use error::{Error, Result};
pub use null::NullMailer;
pub use smtp::{SmtpConfig, SmtpMailer};
