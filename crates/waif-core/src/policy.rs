//! Authorization policy — who may modify a report.

use crate::{
  report::Report,
  user::{Role, User},
};

/// True iff `actor` is an admin or filed `report` themselves.
///
/// Gates edit. Claim and create require only a resolved actor; the
/// self-claim rule lives in the claim transition itself.
pub fn can_modify(actor: &User, report: &Report) -> bool {
  actor.role == Role::Admin || actor.user_id == report.user_id
}
