//! The report lifecycle engine.
//!
//! Orchestrates validation, image ingestion, store mutations, and claim
//! notifications. The persistence backend is a type parameter, as
//! elsewhere in the workspace; the image store and mailer are injected as
//! capability objects.

use std::sync::Arc;

use chrono::NaiveDate;
use futures::future::try_join_all;
use uuid::Uuid;

use crate::{
  Error, Result,
  mail::Mailer,
  media::{ImageStore, MediaError},
  notify::{self, FOUND_CLAIM_RESPONSE},
  policy::can_modify,
  report::{
    NewReport, Report, ReportOwner, ReportType, ReportUpdate, ReportView,
  },
  store::{ReportStore, UserDirectory},
  user::{LoginIdentity, User},
};

// ─── Requests ────────────────────────────────────────────────────────────────

/// Fields accepted when filing a report. `images` holds raw payloads, not
/// URLs; ingestion happens before anything is persisted.
#[derive(Debug, Clone)]
pub struct CreateReport {
  pub report_type: ReportType,
  pub location:    String,
  pub item_name:   String,
  pub category:    String,
  pub date:        NaiveDate,
  pub description: String,
  pub images:      Vec<String>,
}

/// Fields accepted when editing. An empty `images` list preserves the
/// stored URLs; a non-empty list replaces them wholesale.
#[derive(Debug, Clone)]
pub struct EditReport {
  pub location:    String,
  pub item_name:   String,
  pub category:    String,
  pub date:        NaiveDate,
  pub description: String,
  pub images:      Vec<String>,
}

// ─── Engine ──────────────────────────────────────────────────────────────────

/// The orchestration layer behind every API operation.
pub struct ReportEngine<S> {
  store:  S,
  images: Arc<dyn ImageStore>,
  mailer: Arc<dyn Mailer>,
}

impl<S> ReportEngine<S>
where
  S: UserDirectory + ReportStore,
{
  pub fn new(
    store: S,
    images: Arc<dyn ImageStore>,
    mailer: Arc<dyn Mailer>,
  ) -> Self {
    Self { store, images, mailer }
  }

  // ── Directory ─────────────────────────────────────────────────────────────

  /// Upsert the directory entry for an identity asserted at login.
  pub async fn login(&self, identity: LoginIdentity) -> Result<User> {
    self.store.upsert_user(identity).await
  }

  /// Resolve the acting user behind a request.
  pub async fn resolve_actor(&self, email: &str) -> Result<User> {
    self
      .store
      .find_user_by_email(email)
      .await?
      .ok_or_else(|| Error::UserNotFound(email.to_string()))
  }

  // ── Creation ──────────────────────────────────────────────────────────────

  /// File a report. All image payloads are ingested before the row is
  /// written; any ingestion failure aborts the whole operation.
  pub async fn create_report(
    &self,
    actor: &User,
    input: CreateReport,
  ) -> Result<ReportView> {
    validate_text("location", &input.location)?;
    validate_text("item_name", &input.item_name)?;
    validate_text("category", &input.category)?;
    validate_text("description", &input.description)?;
    if input.images.is_empty() {
      return Err(Error::InvalidInput(
        "at least one image is required".to_string(),
      ));
    }

    let images = self.ingest_all(&input.images).await?;

    let report = self
      .store
      .create_report(NewReport {
        report_type: input.report_type,
        location:    input.location,
        item_name:   input.item_name,
        category:    input.category,
        date:        input.date,
        description: input.description,
        images,
        user_id:     actor.user_id,
      })
      .await?;

    Ok(ReportView { report, owner: ReportOwner::from(actor) })
  }

  // ── Edit ──────────────────────────────────────────────────────────────────

  /// Overwrite a report's editable fields. Admin or owner only.
  pub async fn edit_report(
    &self,
    actor: &User,
    id: Uuid,
    input: EditReport,
  ) -> Result<ReportView> {
    let view = self
      .store
      .get_report_view(id)
      .await?
      .ok_or(Error::ReportNotFound(id))?;

    if !can_modify(actor, &view.report) {
      return Err(Error::Forbidden);
    }

    validate_text("location", &input.location)?;
    validate_text("item_name", &input.item_name)?;
    validate_text("category", &input.category)?;
    validate_text("description", &input.description)?;

    let images = if input.images.is_empty() {
      None
    } else {
      Some(self.ingest_all(&input.images).await?)
    };

    let report = self
      .store
      .update_report(id, ReportUpdate {
        location: input.location,
        item_name: input.item_name,
        category: input.category,
        date: input.date,
        description: input.description,
        images,
      })
      .await?;

    Ok(ReportView { report, owner: view.owner })
  }

  /// Physically remove a report. No ownership check is enforced here.
  pub async fn delete_report(&self, id: Uuid) -> Result<()> {
    self.store.delete_report(id).await
  }

  // ── Claim ─────────────────────────────────────────────────────────────────

  /// The one-shot claim transition.
  ///
  /// Persistence is decoupled from delivery: the conditional update is the
  /// durable source of truth, and the mailer's fire-and-forget contract
  /// bounds response latency regardless of transport health.
  pub async fn claim_report(
    &self,
    claimant: &User,
    id: Uuid,
  ) -> Result<ReportView> {
    let view = self
      .store
      .get_report_view(id)
      .await?
      .ok_or(Error::ReportNotFound(id))?;

    if view.report.claimed_by.is_some() {
      return Err(Error::AlreadyClaimed(id));
    }
    if view.owner.email == claimant.email {
      return Err(Error::SelfClaim);
    }

    let response_message = match view.report.report_type {
      ReportType::Found => Some(FOUND_CLAIM_RESPONSE.to_string()),
      ReportType::Lost => None,
    };

    // The store re-checks `claimed_by` atomically; a racing claimant
    // loses there even though the check above already passed.
    let report = self
      .store
      .claim_report(id, claimant.email.clone(), response_message)
      .await?;

    let updated = ReportView { report, owner: view.owner };
    let message = notify::claim_notification(&updated, claimant);
    tracing::info!(
      report_id = %id,
      to = %message.to,
      "dispatching claim notification"
    );
    self.mailer.send(message);

    Ok(updated)
  }

  /// Idempotently acknowledge a claim notification.
  pub async fn mark_read(&self, id: Uuid) -> Result<()> {
    self.store.mark_read(id).await
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  pub async fn all_reports(&self) -> Result<Vec<ReportView>> {
    self.store.list_report_views().await
  }

  pub async fn reports_for(&self, actor: &User) -> Result<Vec<Report>> {
    self.store.list_reports_by_owner(actor.user_id).await
  }

  /// The per-viewer notification feed, derived on every call.
  pub async fn notifications_for(
    &self,
    actor: &User,
  ) -> Result<Vec<ReportView>> {
    let views = self.store.list_report_views().await?;
    Ok(notify::project_notifications(actor, views))
  }

  // ── Helpers ───────────────────────────────────────────────────────────────

  /// Ingest every payload concurrently. Any failure aborts the batch, so a
  /// report is never persisted with a partial image set.
  async fn ingest_all(&self, payloads: &[String]) -> Result<Vec<String>> {
    try_join_all(payloads.iter().map(|p| self.images.put(p)))
      .await
      .map_err(|e| match e {
        MediaError::InvalidPayload(message) => Error::InvalidInput(message),
        backend @ MediaError::Backend(_) => Error::upstream(backend),
      })
  }
}

fn validate_text(field: &'static str, value: &str) -> Result<()> {
  if value.trim().is_empty() {
    return Err(Error::InvalidInput(format!("{field} must not be empty")));
  }
  Ok(())
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
  };

  use async_trait::async_trait;
  use chrono::{NaiveDate, Utc};
  use uuid::Uuid;

  use super::*;
  use crate::{
    mail::EmailMessage,
    user::Role,
  };

  // ── In-memory store ───────────────────────────────────────────────────────

  #[derive(Default, Clone)]
  struct MemStore {
    users:   Arc<Mutex<HashMap<Uuid, User>>>,
    reports: Arc<Mutex<HashMap<Uuid, Report>>>,
  }

  impl UserDirectory for MemStore {
    async fn upsert_user(&self, identity: LoginIdentity) -> Result<User> {
      let mut users = self.users.lock().unwrap();
      if let Some(existing) =
        users.values_mut().find(|u| u.email == identity.email)
      {
        existing.first_name = identity.first_name;
        existing.last_name = identity.last_name;
        existing.role = identity.role;
        return Ok(existing.clone());
      }
      let user = User {
        user_id:    Uuid::new_v4(),
        email:      identity.email,
        first_name: identity.first_name,
        last_name:  identity.last_name,
        role:       identity.role,
        created_at: Utc::now(),
      };
      users.insert(user.user_id, user.clone());
      Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
      Ok(
        self
          .users
          .lock()
          .unwrap()
          .values()
          .find(|u| u.email == email)
          .cloned(),
      )
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
      Ok(self.users.lock().unwrap().get(&id).cloned())
    }
  }

  impl ReportStore for MemStore {
    async fn create_report(&self, input: NewReport) -> Result<Report> {
      let report = Report {
        report_id:        Uuid::new_v4(),
        report_type:      input.report_type,
        location:         input.location,
        item_name:        input.item_name,
        category:         input.category,
        date:             input.date,
        description:      input.description,
        images:           input.images,
        user_id:          input.user_id,
        claimed_by:       None,
        read:             false,
        response_message: None,
        created_at:       Utc::now(),
      };
      self
        .reports
        .lock()
        .unwrap()
        .insert(report.report_id, report.clone());
      Ok(report)
    }

    async fn get_report(&self, id: Uuid) -> Result<Option<Report>> {
      Ok(self.reports.lock().unwrap().get(&id).cloned())
    }

    async fn get_report_view(&self, id: Uuid) -> Result<Option<ReportView>> {
      let report = match self.reports.lock().unwrap().get(&id).cloned() {
        Some(r) => r,
        None => return Ok(None),
      };
      let owner = self
        .users
        .lock()
        .unwrap()
        .get(&report.user_id)
        .cloned()
        .expect("report owner in directory");
      Ok(Some(ReportView { report, owner: ReportOwner::from(&owner) }))
    }

    async fn list_report_views(&self) -> Result<Vec<ReportView>> {
      let reports: Vec<Report> =
        self.reports.lock().unwrap().values().cloned().collect();
      let users = self.users.lock().unwrap();
      Ok(
        reports
          .into_iter()
          .map(|report| {
            let owner = users
              .get(&report.user_id)
              .expect("report owner in directory");
            ReportView { owner: ReportOwner::from(owner), report }
          })
          .collect(),
      )
    }

    async fn list_reports_by_owner(
      &self,
      user_id: Uuid,
    ) -> Result<Vec<Report>> {
      Ok(
        self
          .reports
          .lock()
          .unwrap()
          .values()
          .filter(|r| r.user_id == user_id)
          .cloned()
          .collect(),
      )
    }

    async fn update_report(
      &self,
      id: Uuid,
      update: ReportUpdate,
    ) -> Result<Report> {
      let mut reports = self.reports.lock().unwrap();
      let report = reports.get_mut(&id).ok_or(Error::ReportNotFound(id))?;
      report.location = update.location;
      report.item_name = update.item_name;
      report.category = update.category;
      report.date = update.date;
      report.description = update.description;
      if let Some(images) = update.images {
        report.images = images;
      }
      Ok(report.clone())
    }

    async fn delete_report(&self, id: Uuid) -> Result<()> {
      self
        .reports
        .lock()
        .unwrap()
        .remove(&id)
        .map(|_| ())
        .ok_or(Error::ReportNotFound(id))
    }

    async fn claim_report(
      &self,
      id: Uuid,
      claimed_by: String,
      response_message: Option<String>,
    ) -> Result<Report> {
      let mut reports = self.reports.lock().unwrap();
      let report = reports.get_mut(&id).ok_or(Error::ReportNotFound(id))?;
      if report.claimed_by.is_some() {
        return Err(Error::AlreadyClaimed(id));
      }
      report.claimed_by = Some(claimed_by);
      report.read = false;
      report.response_message = response_message;
      Ok(report.clone())
    }

    async fn mark_read(&self, id: Uuid) -> Result<()> {
      let mut reports = self.reports.lock().unwrap();
      let report = reports.get_mut(&id).ok_or(Error::ReportNotFound(id))?;
      report.read = true;
      Ok(())
    }
  }

  // ── Capability fakes ──────────────────────────────────────────────────────

  /// Echoes payloads back as URLs; `"boom"` fails like a dead backend and
  /// `"garbled"` like a malformed payload.
  struct StubImages;

  #[async_trait]
  impl ImageStore for StubImages {
    async fn put(&self, payload: &str) -> Result<String, MediaError> {
      match payload {
        "boom" => Err(MediaError::Backend("store unavailable".to_string())),
        "garbled" => {
          Err(MediaError::InvalidPayload("not a data uri".to_string()))
        }
        other => Ok(format!("https://img.example/{other}")),
      }
    }
  }

  #[derive(Default)]
  struct RecordingMailer {
    sent: Mutex<Vec<EmailMessage>>,
  }

  impl Mailer for RecordingMailer {
    fn send(&self, message: EmailMessage) {
      self.sent.lock().unwrap().push(message);
    }
  }

  // ── Harness ───────────────────────────────────────────────────────────────

  struct Harness {
    engine: ReportEngine<MemStore>,
    store:  MemStore,
    mailer: Arc<RecordingMailer>,
  }

  fn harness() -> Harness {
    let store = MemStore::default();
    let mailer = Arc::new(RecordingMailer::default());
    let engine = ReportEngine::new(
      store.clone(),
      Arc::new(StubImages),
      mailer.clone(),
    );
    Harness { engine, store, mailer }
  }

  async fn login(h: &Harness, email: &str, role: Role) -> User {
    h.engine
      .login(LoginIdentity {
        email:      email.to_string(),
        first_name: email.split('@').next().unwrap().to_string(),
        last_name:  "Test".to_string(),
        role,
      })
      .await
      .unwrap()
  }

  fn create_input(report_type: ReportType) -> CreateReport {
    CreateReport {
      report_type,
      location: "cafeteria".to_string(),
      item_name: "scarf".to_string(),
      category: "clothing".to_string(),
      date: NaiveDate::from_ymd_opt(2024, 11, 2).unwrap(),
      description: "red wool".to_string(),
      images: vec!["one.png".to_string()],
    }
  }

  fn sent(h: &Harness) -> Vec<EmailMessage> {
    h.mailer.sent.lock().unwrap().clone()
  }

  // ── Login ─────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn login_overwrites_role_but_keeps_user_id() {
    let h = harness();
    let first = login(&h, "ada@example.edu", Role::User).await;
    let second = login(&h, "ada@example.edu", Role::Admin).await;

    assert_eq!(first.user_id, second.user_id);
    assert_eq!(second.role, Role::Admin);
  }

  // ── Creation ──────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn create_ingests_all_images_and_persists() {
    let h = harness();
    let ada = login(&h, "ada@example.edu", Role::User).await;

    let mut input = create_input(ReportType::Lost);
    input.images = vec!["a.png".to_string(), "b.png".to_string()];
    let view = h.engine.create_report(&ada, input).await.unwrap();

    assert_eq!(view.report.images, vec![
      "https://img.example/a.png",
      "https://img.example/b.png"
    ]);
    assert_eq!(view.report.user_id, ada.user_id);
    assert!(view.report.claimed_by.is_none());
    assert!(!view.report.read);
    assert_eq!(view.owner.email, ada.email);
  }

  #[tokio::test]
  async fn create_is_atomic_when_one_ingestion_fails() {
    let h = harness();
    let ada = login(&h, "ada@example.edu", Role::User).await;

    let mut input = create_input(ReportType::Lost);
    input.images = vec!["a.png".to_string(), "boom".to_string()];
    let err = h.engine.create_report(&ada, input).await.unwrap_err();

    assert!(matches!(err, Error::Upstream(_)));
    assert!(h.store.reports.lock().unwrap().is_empty());
  }

  #[tokio::test]
  async fn create_rejects_malformed_payload_as_invalid_input() {
    let h = harness();
    let ada = login(&h, "ada@example.edu", Role::User).await;

    let mut input = create_input(ReportType::Lost);
    input.images = vec!["garbled".to_string()];
    let err = h.engine.create_report(&ada, input).await.unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));
  }

  #[tokio::test]
  async fn create_requires_at_least_one_image() {
    let h = harness();
    let ada = login(&h, "ada@example.edu", Role::User).await;

    let mut input = create_input(ReportType::Lost);
    input.images.clear();
    let err = h.engine.create_report(&ada, input).await.unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));
  }

  #[tokio::test]
  async fn create_rejects_blank_required_fields() {
    let h = harness();
    let ada = login(&h, "ada@example.edu", Role::User).await;

    let mut input = create_input(ReportType::Lost);
    input.item_name = "   ".to_string();
    let err = h.engine.create_report(&ada, input).await.unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));
  }

  // ── Edit ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn edit_by_owner_overwrites_scalars() {
    let h = harness();
    let ada = login(&h, "ada@example.edu", Role::User).await;
    let view = h
      .engine
      .create_report(&ada, create_input(ReportType::Lost))
      .await
      .unwrap();

    let updated = h
      .engine
      .edit_report(&ada, view.report.report_id, EditReport {
        location:    "library".to_string(),
        item_name:   "scarf".to_string(),
        category:    "clothing".to_string(),
        date:        view.report.date,
        description: "red wool, tasseled".to_string(),
        images:      vec![],
      })
      .await
      .unwrap();

    assert_eq!(updated.report.location, "library");
    assert_eq!(updated.report.description, "red wool, tasseled");
    // Empty image list preserves the stored URLs.
    assert_eq!(updated.report.images, view.report.images);
  }

  #[tokio::test]
  async fn edit_with_new_images_replaces_wholesale() {
    let h = harness();
    let ada = login(&h, "ada@example.edu", Role::User).await;
    let view = h
      .engine
      .create_report(&ada, create_input(ReportType::Lost))
      .await
      .unwrap();

    let updated = h
      .engine
      .edit_report(&ada, view.report.report_id, EditReport {
        location:    "cafeteria".to_string(),
        item_name:   "scarf".to_string(),
        category:    "clothing".to_string(),
        date:        view.report.date,
        description: "red wool".to_string(),
        images:      vec!["new.png".to_string()],
      })
      .await
      .unwrap();

    assert_eq!(updated.report.images, vec!["https://img.example/new.png"]);
  }

  #[tokio::test]
  async fn edit_by_stranger_is_forbidden() {
    let h = harness();
    let ada = login(&h, "ada@example.edu", Role::User).await;
    let eve = login(&h, "eve@example.edu", Role::User).await;
    let view = h
      .engine
      .create_report(&ada, create_input(ReportType::Lost))
      .await
      .unwrap();

    let err = h
      .engine
      .edit_report(&eve, view.report.report_id, EditReport {
        location:    "elsewhere".to_string(),
        item_name:   "scarf".to_string(),
        category:    "clothing".to_string(),
        date:        view.report.date,
        description: "red wool".to_string(),
        images:      vec![],
      })
      .await
      .unwrap_err();
    assert!(matches!(err, Error::Forbidden));
  }

  #[tokio::test]
  async fn edit_by_admin_is_allowed() {
    let h = harness();
    let ada = login(&h, "ada@example.edu", Role::User).await;
    let root = login(&h, "admin@example.edu", Role::Admin).await;
    let view = h
      .engine
      .create_report(&ada, create_input(ReportType::Lost))
      .await
      .unwrap();

    let updated = h
      .engine
      .edit_report(&root, view.report.report_id, EditReport {
        location:    "front desk".to_string(),
        item_name:   "scarf".to_string(),
        category:    "clothing".to_string(),
        date:        view.report.date,
        description: "red wool".to_string(),
        images:      vec![],
      })
      .await
      .unwrap();
    assert_eq!(updated.report.location, "front desk");
  }

  #[tokio::test]
  async fn edit_missing_report_is_not_found() {
    let h = harness();
    let ada = login(&h, "ada@example.edu", Role::User).await;

    let err = h
      .engine
      .edit_report(&ada, Uuid::new_v4(), EditReport {
        location:    "x".to_string(),
        item_name:   "y".to_string(),
        category:    "z".to_string(),
        date:        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        description: "w".to_string(),
        images:      vec![],
      })
      .await
      .unwrap_err();
    assert!(matches!(err, Error::ReportNotFound(_)));
  }

  // ── Claim ─────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn claiming_a_lost_report_notifies_the_reporter() {
    let h = harness();
    let ada = login(&h, "ada@example.edu", Role::User).await;
    let bob = login(&h, "bob@example.edu", Role::User).await;
    let view = h
      .engine
      .create_report(&ada, create_input(ReportType::Lost))
      .await
      .unwrap();

    let claimed = h
      .engine
      .claim_report(&bob, view.report.report_id)
      .await
      .unwrap();

    assert_eq!(claimed.report.claimed_by.as_deref(), Some("bob@example.edu"));
    assert!(!claimed.report.read);
    assert!(claimed.report.response_message.is_none());

    let mail = sent(&h);
    assert_eq!(mail.len(), 1);
    assert_eq!(mail[0].to, "ada@example.edu");
    assert!(mail[0].body.contains("bob@example.edu"));
  }

  #[tokio::test]
  async fn claiming_a_found_report_notifies_the_claimant_with_instructions() {
    let h = harness();
    let carol = login(&h, "carol@example.edu", Role::User).await;
    let dan = login(&h, "dan@example.edu", Role::User).await;
    let view = h
      .engine
      .create_report(&carol, create_input(ReportType::Found))
      .await
      .unwrap();

    let claimed = h
      .engine
      .claim_report(&dan, view.report.report_id)
      .await
      .unwrap();

    assert_eq!(
      claimed.report.response_message.as_deref(),
      Some(FOUND_CLAIM_RESPONSE)
    );

    let mail = sent(&h);
    assert_eq!(mail.len(), 1);
    assert_eq!(mail[0].to, "dan@example.edu");
    assert!(mail[0].body.contains("carol@example.edu"));
  }

  #[tokio::test]
  async fn self_claim_is_rejected_without_side_effects() {
    let h = harness();
    let ada = login(&h, "ada@example.edu", Role::User).await;
    let view = h
      .engine
      .create_report(&ada, create_input(ReportType::Lost))
      .await
      .unwrap();

    let err = h
      .engine
      .claim_report(&ada, view.report.report_id)
      .await
      .unwrap_err();
    assert!(matches!(err, Error::SelfClaim));

    let stored = h
      .store
      .get_report(view.report.report_id)
      .await
      .unwrap()
      .unwrap();
    assert!(stored.claimed_by.is_none());
    assert!(sent(&h).is_empty());
  }

  #[tokio::test]
  async fn second_claim_is_rejected_and_state_unchanged() {
    let h = harness();
    let ada = login(&h, "ada@example.edu", Role::User).await;
    let bob = login(&h, "bob@example.edu", Role::User).await;
    let eve = login(&h, "eve@example.edu", Role::User).await;
    let view = h
      .engine
      .create_report(&ada, create_input(ReportType::Lost))
      .await
      .unwrap();

    h.engine
      .claim_report(&bob, view.report.report_id)
      .await
      .unwrap();
    let err = h
      .engine
      .claim_report(&eve, view.report.report_id)
      .await
      .unwrap_err();
    assert!(matches!(err, Error::AlreadyClaimed(_)));

    let stored = h
      .store
      .get_report(view.report.report_id)
      .await
      .unwrap()
      .unwrap();
    assert_eq!(stored.claimed_by.as_deref(), Some("bob@example.edu"));
    assert_eq!(sent(&h).len(), 1);
  }

  #[tokio::test]
  async fn claim_of_missing_report_is_not_found() {
    let h = harness();
    let bob = login(&h, "bob@example.edu", Role::User).await;
    let err = h.engine.claim_report(&bob, Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, Error::ReportNotFound(_)));
  }

  // ── Read tracker ──────────────────────────────────────────────────────────

  #[tokio::test]
  async fn mark_read_is_idempotent() {
    let h = harness();
    let ada = login(&h, "ada@example.edu", Role::User).await;
    let view = h
      .engine
      .create_report(&ada, create_input(ReportType::Lost))
      .await
      .unwrap();
    let id = view.report.report_id;

    h.engine.mark_read(id).await.unwrap();
    h.engine.mark_read(id).await.unwrap();

    let stored = h.store.get_report(id).await.unwrap().unwrap();
    assert!(stored.read);
  }

  #[tokio::test]
  async fn mark_read_of_missing_report_is_not_found() {
    let h = harness();
    let err = h.engine.mark_read(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, Error::ReportNotFound(_)));
  }

  #[tokio::test]
  async fn a_fresh_claim_resets_read() {
    let h = harness();
    let ada = login(&h, "ada@example.edu", Role::User).await;
    let bob = login(&h, "bob@example.edu", Role::User).await;
    let view = h
      .engine
      .create_report(&ada, create_input(ReportType::Lost))
      .await
      .unwrap();
    let id = view.report.report_id;

    h.engine.mark_read(id).await.unwrap();
    let claimed = h.engine.claim_report(&bob, id).await.unwrap();
    assert!(!claimed.report.read);
  }

  // ── Feed ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn notification_feed_matches_the_projection_rule() {
    let h = harness();
    let ada = login(&h, "ada@example.edu", Role::User).await;
    let bob = login(&h, "bob@example.edu", Role::User).await;
    let root = login(&h, "admin@example.edu", Role::Admin).await;

    let lost = h
      .engine
      .create_report(&ada, create_input(ReportType::Lost))
      .await
      .unwrap();
    let found = h
      .engine
      .create_report(&ada, create_input(ReportType::Found))
      .await
      .unwrap();
    // A third report nobody claims.
    h.engine
      .create_report(&bob, create_input(ReportType::Lost))
      .await
      .unwrap();

    h.engine.claim_report(&bob, lost.report.report_id).await.unwrap();
    h.engine.claim_report(&bob, found.report.report_id).await.unwrap();

    // Ada filed the lost report, so its claim notifies her feed.
    let ada_feed = h.engine.notifications_for(&ada).await.unwrap();
    assert_eq!(ada_feed.len(), 1);
    assert_eq!(ada_feed[0].report.report_id, lost.report.report_id);

    // Bob claimed the found report, so that one lands in his feed.
    let bob_feed = h.engine.notifications_for(&bob).await.unwrap();
    assert_eq!(bob_feed.len(), 1);
    assert_eq!(bob_feed[0].report.report_id, found.report.report_id);

    // Admin sees every claimed report.
    let admin_feed = h.engine.notifications_for(&root).await.unwrap();
    assert_eq!(admin_feed.len(), 2);
  }
}
