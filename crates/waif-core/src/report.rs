//! Report types — a lost- or found-item listing and its derived read model.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::user::User;

/// Whether the reporter lost the item or found someone else's.
/// Immutable after creation; decides who a claim notifies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportType {
  Lost,
  Found,
}

/// A persisted lost/found report.
///
/// `claimed_by` transitions from `None` to `Some` at most once; `read`
/// tracks whether the claim notification has been acknowledged by its
/// recipient.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
  pub report_id:        Uuid,
  pub report_type:      ReportType,
  pub location:         String,
  pub item_name:        String,
  pub category:         String,
  /// Calendar date of the loss or find.
  pub date:             NaiveDate,
  pub description:      String,
  /// Durable retrieval URLs produced by image ingestion; never raw
  /// payloads.
  pub images:           Vec<String>,
  /// The reporter. Set once at creation from the authenticated actor.
  pub user_id:          Uuid,
  /// Email of the claiming user; `None` = unclaimed.
  pub claimed_by:       Option<String>,
  pub read:             bool,
  /// Collection instructions shown to the claimant of a found item.
  pub response_message: Option<String>,
  /// Server-assigned timestamp; never changes after creation.
  pub created_at:       DateTime<Utc>,
}

/// Input to [`crate::store::ReportStore::create_report`].
/// `report_id` and `created_at` are assigned by the store; the claim
/// fields start unset.
#[derive(Debug, Clone)]
pub struct NewReport {
  pub report_type: ReportType,
  pub location:    String,
  pub item_name:   String,
  pub category:    String,
  pub date:        NaiveDate,
  pub description: String,
  pub images:      Vec<String>,
  pub user_id:     Uuid,
}

/// Input to [`crate::store::ReportStore::update_report`].
///
/// Scalar fields are written unconditionally — callers resend the full
/// set. `images: None` preserves the stored URLs; `Some` replaces them
/// wholesale.
#[derive(Debug, Clone)]
pub struct ReportUpdate {
  pub location:    String,
  pub item_name:   String,
  pub category:    String,
  pub date:        NaiveDate,
  pub description: String,
  pub images:      Option<Vec<String>>,
}

/// The owner fields joined into a [`ReportView`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportOwner {
  pub user_id:    Uuid,
  pub email:      String,
  pub first_name: String,
  pub last_name:  String,
}

impl From<&User> for ReportOwner {
  fn from(user: &User) -> Self {
    Self {
      user_id:    user.user_id,
      email:      user.email.clone(),
      first_name: user.first_name.clone(),
      last_name:  user.last_name.clone(),
    }
  }
}

/// The read model served to clients — a report joined with its owner's
/// directory entry. Never stored, always derived.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportView {
  #[serde(flatten)]
  pub report: Report,
  pub owner:  ReportOwner,
}
