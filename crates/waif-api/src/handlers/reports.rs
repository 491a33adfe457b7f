//! Handlers for the `/reports` endpoints.
//!
//! | Method   | Path                  | Notes |
//! |----------|-----------------------|-------|
//! | `POST`   | `/reports`            | file a report; images are raw payloads |
//! | `GET`    | `/reports`            | all reports, owner populated |
//! | `GET`    | `/reports/user`       | the actor's own reports |
//! | `PUT`    | `/reports/{id}`       | owner or admin only |
//! | `DELETE` | `/reports/{id}`       | no ownership check |
//! | `POST`   | `/reports/{id}/claim` | one-shot claim transition |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;
use waif_core::{
  engine::{CreateReport, EditReport},
  report::{Report, ReportType, ReportView},
  store::{ReportStore, UserDirectory},
};

use crate::{AppState, auth::Actor, error::ApiError};

// ─── Create ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub report_type: ReportType,
  pub location:    String,
  pub item_name:   String,
  pub category:    String,
  pub date:        NaiveDate,
  pub description: String,
  #[serde(default)]
  pub images:      Vec<String>,
}

/// `POST /reports`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  Actor(actor): Actor,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: UserDirectory + ReportStore + 'static,
{
  let view = state
    .engine
    .create_report(&actor, CreateReport {
      report_type: body.report_type,
      location:    body.location,
      item_name:   body.item_name,
      category:    body.category,
      date:        body.date,
      description: body.description,
      images:      body.images,
    })
    .await?;
  Ok((StatusCode::CREATED, Json(view)))
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /reports` — every report, owner populated. No auth required.
pub async fn list<S>(
  State(state): State<AppState<S>>,
) -> Result<Json<Vec<ReportView>>, ApiError>
where
  S: UserDirectory + ReportStore + 'static,
{
  Ok(Json(state.engine.all_reports().await?))
}

/// `GET /reports/user` — the actor's own reports.
pub async fn list_mine<S>(
  State(state): State<AppState<S>>,
  Actor(actor): Actor,
) -> Result<Json<Vec<Report>>, ApiError>
where
  S: UserDirectory + ReportStore + 'static,
{
  Ok(Json(state.engine.reports_for(&actor).await?))
}

// ─── Edit ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct EditBody {
  pub location:    String,
  pub item_name:   String,
  pub category:    String,
  pub date:        NaiveDate,
  pub description: String,
  /// Empty or omitted preserves the stored images; non-empty replaces
  /// them wholesale.
  #[serde(default)]
  pub images:      Vec<String>,
}

/// `PUT /reports/{id}`
pub async fn edit<S>(
  State(state): State<AppState<S>>,
  Actor(actor): Actor,
  Path(id): Path<Uuid>,
  Json(body): Json<EditBody>,
) -> Result<Json<ReportView>, ApiError>
where
  S: UserDirectory + ReportStore + 'static,
{
  let view = state
    .engine
    .edit_report(&actor, id, EditReport {
      location:    body.location,
      item_name:   body.item_name,
      category:    body.category,
      date:        body.date,
      description: body.description,
      images:      body.images,
    })
    .await?;
  Ok(Json(view))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /reports/{id}` — physical removal; no ownership check.
pub async fn remove<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError>
where
  S: UserDirectory + ReportStore + 'static,
{
  state.engine.delete_report(id).await?;
  Ok(Json(json!({ "message": "Report deleted successfully" })))
}

// ─── Claim ────────────────────────────────────────────────────────────────────

/// `POST /reports/{id}/claim`
pub async fn claim<S>(
  State(state): State<AppState<S>>,
  Actor(actor): Actor,
  Path(id): Path<Uuid>,
) -> Result<Json<ReportView>, ApiError>
where
  S: UserDirectory + ReportStore + 'static,
{
  let view = state.engine.claim_report(&actor, id).await?;
  Ok(Json(view))
}
