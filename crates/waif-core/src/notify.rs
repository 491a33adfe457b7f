//! Claim notifications — recipient selection, message composition, and the
//! per-viewer projection.

use crate::{
  mail::EmailMessage,
  report::{ReportType, ReportView},
  user::{Role, User},
};

/// Instruction shown to the claimant of a found-item report.
pub const FOUND_CLAIM_RESPONSE: &str =
  "You can claim your item from the security room.";

/// Compose the email triggered by a successful claim.
///
/// For a lost report the original reporter hears that someone has their
/// item; for a found report the claimant hears where to collect it.
pub fn claim_notification(view: &ReportView, claimant: &User) -> EmailMessage {
  match view.report.report_type {
    ReportType::Lost => EmailMessage {
      to:      view.owner.email.clone(),
      subject: "Your Lost Item has been Claimed".to_string(),
      body:    format!(
        "Hello {},\n\nYour lost item \"{}\" has been claimed by {} {} (Email: {}).\n\nPlease contact the security office to retrieve your item.\n\nBest regards,\nYour Lost and Found Team",
        view.owner.first_name,
        view.report.item_name,
        claimant.first_name,
        claimant.last_name,
        claimant.email,
      ),
    },
    ReportType::Found => EmailMessage {
      to:      claimant.email.clone(),
      subject: "Your Found Item has been Located".to_string(),
      body:    format!(
        "Dear {},\n\nYour item \"{}\" has been found by {} {} (Email: {}).\n\nPlease contact the security office to retrieve your item.\n\nBest regards,\nYour Lost and Found Team",
        claimant.first_name,
        view.report.item_name,
        view.owner.first_name,
        view.owner.last_name,
        view.owner.email,
      ),
    },
  }
}

/// Whether `view` appears in `actor`'s notification feed.
///
/// Admins see every claimed report. A regular user sees claims on lost
/// reports they filed, and found reports they themselves claimed.
pub fn is_notification_for(actor: &User, view: &ReportView) -> bool {
  let Some(claimed_by) = view.report.claimed_by.as_deref() else {
    return false;
  };
  match actor.role {
    Role::Admin => true,
    Role::User => match view.report.report_type {
      ReportType::Lost => view.owner.email == actor.email,
      ReportType::Found => claimed_by == actor.email,
    },
  }
}

/// Derive the visible notification set. Recomputed on every fetch — never
/// cached.
pub fn project_notifications(
  actor: &User,
  views: Vec<ReportView>,
) -> Vec<ReportView> {
  views
    .into_iter()
    .filter(|v| is_notification_for(actor, v))
    .collect()
}
