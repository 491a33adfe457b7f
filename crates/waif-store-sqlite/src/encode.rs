//! Encoding and decoding helpers between Rust domain types and the
//! plain-text representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings, calendar dates as ISO 8601,
//! image URL lists as compact JSON, UUIDs as hyphenated lowercase strings.

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;
use waif_core::{
  report::{Report, ReportOwner, ReportType, ReportView},
  user::{Role, User},
};

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── Timestamps and dates ─────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::Decode(e.to_string()))
}

pub fn encode_date(d: NaiveDate) -> String { d.to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  s.parse()
    .map_err(|_| Error::Decode(format!("invalid calendar date: {s:?}")))
}

// ─── Role ─────────────────────────────────────────────────────────────────────

pub fn encode_role(role: Role) -> &'static str {
  match role {
    Role::User => "user",
    Role::Admin => "admin",
  }
}

pub fn decode_role(s: &str) -> Result<Role> {
  match s {
    "user" => Ok(Role::User),
    "admin" => Ok(Role::Admin),
    other => Err(Error::Decode(format!("unknown role: {other:?}"))),
  }
}

// ─── ReportType ───────────────────────────────────────────────────────────────

pub fn encode_report_type(t: ReportType) -> &'static str {
  match t {
    ReportType::Lost => "lost",
    ReportType::Found => "found",
  }
}

pub fn decode_report_type(s: &str) -> Result<ReportType> {
  match s {
    "lost" => Ok(ReportType::Lost),
    "found" => Ok(ReportType::Found),
    other => Err(Error::Decode(format!("unknown report type: {other:?}"))),
  }
}

// ─── Image URL lists ──────────────────────────────────────────────────────────

pub fn encode_images(urls: &[String]) -> Result<String> {
  Ok(serde_json::to_string(urls)?)
}

pub fn decode_images(s: &str) -> Result<Vec<String>> {
  Ok(serde_json::from_str(s)?)
}

// ─── Row types ────────────────────────────────────────────────────────────────

/// Raw strings read directly from a `users` row.
pub struct RawUser {
  pub user_id:    String,
  pub email:      String,
  pub first_name: String,
  pub last_name:  String,
  pub role:       String,
  pub created_at: String,
}

impl RawUser {
  pub fn into_user(self) -> Result<User> {
    Ok(User {
      user_id:    decode_uuid(&self.user_id)?,
      email:      self.email,
      first_name: self.first_name,
      last_name:  self.last_name,
      role:       decode_role(&self.role)?,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from a `reports` row.
pub struct RawReport {
  pub report_id:        String,
  pub report_type:      String,
  pub location:         String,
  pub item_name:        String,
  pub category:         String,
  pub date:             String,
  pub description:      String,
  pub images:           String,
  pub user_id:          String,
  pub claimed_by:       Option<String>,
  pub read:             bool,
  pub response_message: Option<String>,
  pub created_at:       String,
}

impl RawReport {
  pub fn into_report(self) -> Result<Report> {
    Ok(Report {
      report_id:        decode_uuid(&self.report_id)?,
      report_type:      decode_report_type(&self.report_type)?,
      location:         self.location,
      item_name:        self.item_name,
      category:         self.category,
      date:             decode_date(&self.date)?,
      description:      self.description,
      images:           decode_images(&self.images)?,
      user_id:          decode_uuid(&self.user_id)?,
      claimed_by:       self.claimed_by,
      read:             self.read,
      response_message: self.response_message,
      created_at:       decode_dt(&self.created_at)?,
    })
  }
}

/// A `reports` row joined with the owner columns from `users`.
pub struct RawReportView {
  pub report:           RawReport,
  pub owner_email:      String,
  pub owner_first_name: String,
  pub owner_last_name:  String,
}

impl RawReportView {
  pub fn into_view(self) -> Result<ReportView> {
    let report = self.report.into_report()?;
    let owner = ReportOwner {
      user_id:    report.user_id,
      email:      self.owner_email,
      first_name: self.owner_first_name,
      last_name:  self.owner_last_name,
    };
    Ok(ReportView { report, owner })
  }
}
