//! JSON REST API for Waif.
//!
//! Exposes an axum [`Router`] backed by any store implementing the core
//! traits, with injected image-store and mailer capabilities. Identity
//! verification happens upstream; requests carry the authenticated actor's
//! email in a trusted header.

pub mod auth;
pub mod error;
pub mod handlers;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{get, post, put},
};
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use waif_core::{
  engine::ReportEngine,
  store::{ReportStore, UserDirectory},
};

pub use error::ApiError;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  pub host:           String,
  pub port:           u16,
  pub store_path:     PathBuf,
  /// Directory that ingested images are written to.
  pub media_dir:      PathBuf,
  /// Public base URL that stored images are served under.
  pub media_base_url: String,
  /// Emails allowed to log in as admin. Unset = no restriction.
  #[serde(default)]
  pub admin_emails: Option<Vec<String>>,
  /// Domain regular accounts must belong to. Unset = no restriction.
  #[serde(default)]
  pub allowed_email_domain: Option<String>,
  /// SMTP relay settings. Unset = notifications are logged and dropped.
  #[serde(default)]
  pub smtp: Option<SmtpSettings>,
}

/// SMTP relay section of the config file.
#[derive(Debug, Deserialize, Clone)]
pub struct SmtpSettings {
  pub host:     String,
  pub username: String,
  pub password: String,
  pub from:     String,
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct AppState<S> {
  pub engine: Arc<ReportEngine<S>>,
  pub config: Arc<ServerConfig>,
}

impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self {
      engine: Arc::clone(&self.engine),
      config: Arc::clone(&self.config),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router
/// regardless of its own state type.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: UserDirectory + ReportStore + 'static,
{
  Router::new()
    // Directory
    .route("/auth/login", post(handlers::login::handler::<S>))
    // Reports
    .route(
      "/reports",
      post(handlers::reports::create::<S>).get(handlers::reports::list::<S>),
    )
    .route("/reports/user", get(handlers::reports::list_mine::<S>))
    .route(
      "/reports/{id}",
      put(handlers::reports::edit::<S>).delete(handlers::reports::remove::<S>),
    )
    .route("/reports/{id}/claim", post(handlers::reports::claim::<S>))
    // Notifications
    .route(
      "/reports/notifications",
      get(handlers::notifications::list::<S>),
    )
    .route(
      "/reports/notification/{id}/read",
      put(handlers::notifications::mark_read::<S>),
    )
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────
