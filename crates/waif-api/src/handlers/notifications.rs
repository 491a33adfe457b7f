//! Handlers for the notification feed and read tracker.

use axum::{
  Json,
  extract::{Path, State},
};
use serde_json::json;
use uuid::Uuid;
use waif_core::{
  report::ReportView,
  store::{ReportStore, UserDirectory},
};

use crate::{AppState, auth::Actor, error::ApiError};

/// `GET /reports/notifications` — the per-viewer projection, recomputed on
/// every fetch.
pub async fn list<S>(
  State(state): State<AppState<S>>,
  Actor(actor): Actor,
) -> Result<Json<Vec<ReportView>>, ApiError>
where
  S: UserDirectory + ReportStore + 'static,
{
  Ok(Json(state.engine.notifications_for(&actor).await?))
}

/// `PUT /reports/notification/{id}/read` — idempotent. The actor must
/// resolve, but any resolved actor may acknowledge any notification.
pub async fn mark_read<S>(
  State(state): State<AppState<S>>,
  Actor(_actor): Actor,
  Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError>
where
  S: UserDirectory + ReportStore + 'static,
{
  state.engine.mark_read(id).await?;
  Ok(Json(json!({ "message": "Notification marked as read" })))
}
