//! The `UserDirectory` and `ReportStore` traits.
//!
//! Implemented by storage backends (e.g. `waif-store-sqlite`). Higher
//! layers depend on these abstractions, not on any concrete backend.
//!
//! Both traits speak the core [`Error`](crate::Error) vocabulary directly:
//! the claim transition must surface `AlreadyClaimed` from inside the
//! store's atomic update, so domain errors are part of the contract and
//! backends wrap their internal failures in `Error::Upstream`.

use std::future::Future;

use uuid::Uuid;

use crate::{
  Result,
  report::{NewReport, Report, ReportUpdate, ReportView},
  user::{LoginIdentity, User},
};

// ─── User directory ──────────────────────────────────────────────────────────

/// Abstraction over the user directory.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait UserDirectory: Send + Sync {
  /// Insert the entry on first login; afterwards overwrite `first_name`,
  /// `last_name`, and `role` with the asserted values. `user_id` is stable
  /// across logins.
  fn upsert_user(
    &self,
    identity: LoginIdentity,
  ) -> impl Future<Output = Result<User>> + Send + '_;

  /// Look up a user by exact (case-sensitive) email.
  fn find_user_by_email<'a>(
    &'a self,
    email: &'a str,
  ) -> impl Future<Output = Result<Option<User>>> + Send + 'a;

  /// Retrieve a user by id. Returns `None` if not found.
  fn get_user(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<User>>> + Send + '_;
}

// ─── Report store ────────────────────────────────────────────────────────────

/// Abstraction over persisted reports.
pub trait ReportStore: Send + Sync {
  /// Persist a new report. `report_id` and `created_at` are assigned by
  /// the store; `claimed_by` starts unset and `read` false.
  fn create_report(
    &self,
    input: NewReport,
  ) -> impl Future<Output = Result<Report>> + Send + '_;

  /// Retrieve a report by id. Returns `None` if not found.
  fn get_report(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Report>>> + Send + '_;

  /// Retrieve a report joined with its owner's directory entry.
  fn get_report_view(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<ReportView>>> + Send + '_;

  /// List every report with its owner populated.
  fn list_report_views(
    &self,
  ) -> impl Future<Output = Result<Vec<ReportView>>> + Send + '_;

  /// List the reports filed by one user.
  fn list_reports_by_owner(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Report>>> + Send + '_;

  /// Overwrite the editable fields. Fails with
  /// [`Error::ReportNotFound`](crate::Error::ReportNotFound) if absent.
  fn update_report(
    &self,
    id: Uuid,
    update: ReportUpdate,
  ) -> impl Future<Output = Result<Report>> + Send + '_;

  /// Physically remove a report. Fails with `ReportNotFound` if absent.
  fn delete_report(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<()>> + Send + '_;

  /// The claim transition: atomically set `claimed_by` and
  /// `response_message` and force `read = false`, conditional on the
  /// report being unclaimed. Two concurrent claimants serialize here; the
  /// loser gets [`Error::AlreadyClaimed`](crate::Error::AlreadyClaimed).
  fn claim_report(
    &self,
    id: Uuid,
    claimed_by: String,
    response_message: Option<String>,
  ) -> impl Future<Output = Result<Report>> + Send + '_;

  /// Idempotently set `read = true`. Fails with `ReportNotFound` if
  /// absent.
  fn mark_read(&self, id: Uuid) -> impl Future<Output = Result<()>> + Send + '_;
}
