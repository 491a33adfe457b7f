//! User — the directory entry behind every actor.
//!
//! Users are created on first login and refreshed on every subsequent one.
//! The identity provider in front of this service has already verified the
//! email; the directory only records what was asserted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The organizational role asserted at login time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
  User,
  Admin,
}

/// A directory entry. `user_id` is store-assigned and stable across
/// logins; name and role are overwritten with whatever the latest login
/// asserted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
  pub user_id:    Uuid,
  /// Unique, case-sensitive match key.
  pub email:      String,
  pub first_name: String,
  pub last_name:  String,
  pub role:       Role,
  pub created_at: DateTime<Utc>,
}

/// The identity asserted by the external identity provider at login.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginIdentity {
  pub email:      String,
  pub first_name: String,
  pub last_name:  String,
  pub role:       Role,
}
