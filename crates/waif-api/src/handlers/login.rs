//! Handler for `POST /auth/login`.
//!
//! The body carries the identity asserted by the external identity
//! provider; token verification happened upstream. The directory entry is
//! created on first login and refreshed on every subsequent one.

use axum::{Json, extract::State};
use waif_core::{
  store::{ReportStore, UserDirectory},
  user::{LoginIdentity, Role, User},
};

use crate::{AppState, ServerConfig, error::ApiError};

/// Admission rules mirroring the deployment's organization policy. Both
/// are optional; an unset rule admits everyone.
fn check_admission(
  config: &ServerConfig,
  identity: &LoginIdentity,
) -> Result<(), ApiError> {
  match identity.role {
    Role::Admin => {
      if let Some(allowed) = &config.admin_emails
        && !allowed.iter().any(|email| email == &identity.email)
      {
        return Err(ApiError::BadRequest(
          "email is not allowed to log in as admin".to_string(),
        ));
      }
    }
    Role::User => {
      if let Some(domain) = &config.allowed_email_domain
        && !identity.email.ends_with(&format!("@{domain}"))
      {
        return Err(ApiError::BadRequest(
          "email is outside the allowed domain".to_string(),
        ));
      }
    }
  }
  Ok(())
}

/// `POST /auth/login`
pub async fn handler<S>(
  State(state): State<AppState<S>>,
  Json(identity): Json<LoginIdentity>,
) -> Result<Json<User>, ApiError>
where
  S: UserDirectory + ReportStore + 'static,
{
  check_admission(&state.config, &identity)?;
  let user = state.engine.login(identity).await?;
  Ok(Json(user))
}
