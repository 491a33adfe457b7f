//! Actor extraction.
//!
//! Requests carry the authenticated actor's email in an `email` header,
//! placed there by the identity layer in front of this service and trusted
//! as-is. The extractor resolves the directory entry once per request;
//! handlers receive a full [`User`].

use axum::{extract::FromRequestParts, http::request::Parts};
use waif_core::{
  store::{ReportStore, UserDirectory},
  user::User,
};

use crate::{AppState, error::ApiError};

/// Header carrying the authenticated actor's email address.
pub const ACTOR_HEADER: &str = "email";

/// The resolved acting user.
pub struct Actor(pub User);

impl<S> FromRequestParts<AppState<S>> for Actor
where
  S: UserDirectory + ReportStore + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    let email = parts
      .headers
      .get(ACTOR_HEADER)
      .and_then(|v| v.to_str().ok())
      .ok_or_else(|| ApiError::BadRequest("missing email header".to_string()))?;

    let user = state.engine.resolve_actor(email).await?;
    Ok(Actor(user))
  }
}
