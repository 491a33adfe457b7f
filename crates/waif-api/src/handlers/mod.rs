//! HTTP handlers, grouped by surface.

pub mod login;
pub mod notifications;
pub mod reports;
