//! [`SqliteStore`] — the SQLite implementation of the store traits.

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use waif_core::{
  Error as CoreError, Result as CoreResult,
  report::{NewReport, Report, ReportUpdate, ReportView},
  store::{ReportStore, UserDirectory},
  user::{LoginIdentity, User},
};

use crate::{
  Error, Result,
  encode::{
    RawReport, RawReportView, RawUser, encode_date, encode_dt, encode_images,
    encode_report_type, encode_role, encode_uuid,
  },
  schema::SCHEMA,
};

const USER_COLS: &str =
  "user_id, email, first_name, last_name, role, created_at";

const REPORT_COLS: &str = "report_id, report_type, location, item_name, \
                           category, date, description, images, user_id, \
                           claimed_by, read, response_message, created_at";

// ─── Row mappers ─────────────────────────────────────────────────────────────

fn user_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawUser> {
  Ok(RawUser {
    user_id:    row.get(0)?,
    email:      row.get(1)?,
    first_name: row.get(2)?,
    last_name:  row.get(3)?,
    role:       row.get(4)?,
    created_at: row.get(5)?,
  })
}

fn report_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawReport> {
  Ok(RawReport {
    report_id:        row.get(0)?,
    report_type:      row.get(1)?,
    location:         row.get(2)?,
    item_name:        row.get(3)?,
    category:         row.get(4)?,
    date:             row.get(5)?,
    description:      row.get(6)?,
    images:           row.get(7)?,
    user_id:          row.get(8)?,
    claimed_by:       row.get(9)?,
    read:             row.get(10)?,
    response_message: row.get(11)?,
    created_at:       row.get(12)?,
  })
}

fn view_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawReportView> {
  Ok(RawReportView {
    report:           report_row(row)?,
    owner_email:      row.get(13)?,
    owner_first_name: row.get(14)?,
    owner_last_name:  row.get(15)?,
  })
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Waif store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Internal fetch/apply helpers ──────────────────────────────────────────

  async fn fetch_user_by_email(
    &self,
    email: String,
  ) -> Result<Option<RawUser>> {
    let raw = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {USER_COLS} FROM users WHERE email = ?1"),
              rusqlite::params![email],
              user_row,
            )
            .optional()?,
        )
      })
      .await?;
    Ok(raw)
  }

  async fn fetch_user_by_id(&self, id: Uuid) -> Result<Option<RawUser>> {
    let id_str = encode_uuid(id);
    let raw = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {USER_COLS} FROM users WHERE user_id = ?1"),
              rusqlite::params![id_str],
              user_row,
            )
            .optional()?,
        )
      })
      .await?;
    Ok(raw)
  }

  async fn fetch_report(&self, id: Uuid) -> Result<Option<RawReport>> {
    let id_str = encode_uuid(id);
    let raw = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {REPORT_COLS} FROM reports WHERE report_id = ?1"),
              rusqlite::params![id_str],
              report_row,
            )
            .optional()?,
        )
      })
      .await?;
    Ok(raw)
  }

  /// Insert a fully-built [`Report`] into the `reports` table.
  async fn insert_report(&self, report: &Report) -> Result<()> {
    let report_id_str = encode_uuid(report.report_id);
    let report_type   = encode_report_type(report.report_type).to_owned();
    let location      = report.location.clone();
    let item_name     = report.item_name.clone();
    let category      = report.category.clone();
    let date_str      = encode_date(report.date);
    let description   = report.description.clone();
    let images_str    = encode_images(&report.images)?;
    let user_id_str   = encode_uuid(report.user_id);
    let created_str   = encode_dt(report.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO reports (
             report_id, report_type, location, item_name, category,
             date, description, images, user_id,
             claimed_by, read, response_message, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, NULL, 0, NULL, ?10)",
          rusqlite::params![
            report_id_str,
            report_type,
            location,
            item_name,
            category,
            date_str,
            description,
            images_str,
            user_id_str,
            created_str,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── UserDirectory impl ──────────────────────────────────────────────────────

impl UserDirectory for SqliteStore {
  async fn upsert_user(&self, identity: LoginIdentity) -> CoreResult<User> {
    let fresh_id = encode_uuid(Uuid::new_v4());
    let created  = encode_dt(Utc::now());
    let email    = identity.email.clone();
    let first    = identity.first_name;
    let last     = identity.last_name;
    let role     = encode_role(identity.role).to_owned();

    let raw: RawUser = self
      .conn
      .call(move |conn| {
        // First login inserts; later logins keep the original user_id and
        // created_at but overwrite name and role.
        conn.execute(
          "INSERT INTO users (user_id, email, first_name, last_name, role, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)
           ON CONFLICT(email) DO UPDATE SET
             first_name = excluded.first_name,
             last_name  = excluded.last_name,
             role       = excluded.role",
          rusqlite::params![fresh_id, email, first, last, role, created],
        )?;
        let raw = conn.query_row(
          &format!("SELECT {USER_COLS} FROM users WHERE email = ?1"),
          rusqlite::params![email],
          user_row,
        )?;
        Ok(raw)
      })
      .await
      .map_err(Error::Database)?;

    Ok(raw.into_user()?)
  }

  async fn find_user_by_email(&self, email: &str) -> CoreResult<Option<User>> {
    let raw = self.fetch_user_by_email(email.to_string()).await?;
    Ok(raw.map(RawUser::into_user).transpose()?)
  }

  async fn get_user(&self, id: Uuid) -> CoreResult<Option<User>> {
    let raw = self.fetch_user_by_id(id).await?;
    Ok(raw.map(RawUser::into_user).transpose()?)
  }
}

// ─── ReportStore impl ────────────────────────────────────────────────────────

impl ReportStore for SqliteStore {
  async fn create_report(&self, input: NewReport) -> CoreResult<Report> {
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

    self.insert_report(&report).await?;
    Ok(report)
  }

  async fn get_report(&self, id: Uuid) -> CoreResult<Option<Report>> {
    let raw = self.fetch_report(id).await?;
    Ok(raw.map(RawReport::into_report).transpose()?)
  }

  async fn get_report_view(&self, id: Uuid) -> CoreResult<Option<ReportView>> {
    let id_str = encode_uuid(id);
    let raw: Option<RawReportView> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT r.report_id, r.report_type, r.location, r.item_name,
                      r.category, r.date, r.description, r.images, r.user_id,
                      r.claimed_by, r.read, r.response_message, r.created_at,
                      u.email, u.first_name, u.last_name
               FROM reports r
               JOIN users u ON u.user_id = r.user_id
               WHERE r.report_id = ?1",
              rusqlite::params![id_str],
              view_row,
            )
            .optional()?,
        )
      })
      .await
      .map_err(Error::Database)?;

    Ok(raw.map(RawReportView::into_view).transpose()?)
  }

  async fn list_report_views(&self) -> CoreResult<Vec<ReportView>> {
    let raws: Vec<RawReportView> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT r.report_id, r.report_type, r.location, r.item_name,
                  r.category, r.date, r.description, r.images, r.user_id,
                  r.claimed_by, r.read, r.response_message, r.created_at,
                  u.email, u.first_name, u.last_name
           FROM reports r
           JOIN users u ON u.user_id = r.user_id
           ORDER BY r.created_at",
        )?;
        let rows = stmt
          .query_map([], view_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await
      .map_err(Error::Database)?;

    Ok(
      raws
        .into_iter()
        .map(RawReportView::into_view)
        .collect::<Result<_>>()?,
    )
  }

  async fn list_reports_by_owner(
    &self,
    user_id: Uuid,
  ) -> CoreResult<Vec<Report>> {
    let user_id_str = encode_uuid(user_id);
    let raws: Vec<RawReport> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {REPORT_COLS} FROM reports
           WHERE user_id = ?1
           ORDER BY created_at"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![user_id_str], report_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await
      .map_err(Error::Database)?;

    Ok(
      raws
        .into_iter()
        .map(RawReport::into_report)
        .collect::<Result<_>>()?,
    )
  }

  async fn update_report(
    &self,
    id: Uuid,
    update: ReportUpdate,
  ) -> CoreResult<Report> {
    let id_str      = encode_uuid(id);
    let location    = update.location;
    let item_name   = update.item_name;
    let category    = update.category;
    let date_str    = encode_date(update.date);
    let description = update.description;
    let images_str  = update.images.as_deref().map(encode_images).transpose()?;

    let rows = self
      .conn
      .call(move |conn| {
        // COALESCE keeps the stored image list when no replacement is
        // supplied.
        let rows = conn.execute(
          "UPDATE reports SET
             location    = ?2,
             item_name   = ?3,
             category    = ?4,
             date        = ?5,
             description = ?6,
             images      = COALESCE(?7, images)
           WHERE report_id = ?1",
          rusqlite::params![
            id_str,
            location,
            item_name,
            category,
            date_str,
            description,
            images_str,
          ],
        )?;
        Ok(rows)
      })
      .await
      .map_err(Error::Database)?;

    if rows == 0 {
      return Err(CoreError::ReportNotFound(id));
    }

    let raw = self
      .fetch_report(id)
      .await?
      .ok_or(CoreError::ReportNotFound(id))?;
    Ok(raw.into_report()?)
  }

  async fn delete_report(&self, id: Uuid) -> CoreResult<()> {
    let id_str = encode_uuid(id);
    let rows = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM reports WHERE report_id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await
      .map_err(Error::Database)?;

    if rows == 0 {
      return Err(CoreError::ReportNotFound(id));
    }
    Ok(())
  }

  async fn claim_report(
    &self,
    id: Uuid,
    claimed_by: String,
    response_message: Option<String>,
  ) -> CoreResult<Report> {
    let id_str = encode_uuid(id);
    let rows = self
      .conn
      .call(move |conn| {
        // Compare-and-set: the claim only lands if the report is still
        // unclaimed, so two concurrent claimants serialize here.
        let rows = conn.execute(
          "UPDATE reports SET
             claimed_by       = ?2,
             read             = 0,
             response_message = ?3
           WHERE report_id = ?1 AND claimed_by IS NULL",
          rusqlite::params![id_str, claimed_by, response_message],
        )?;
        Ok(rows)
      })
      .await
      .map_err(Error::Database)?;

    if rows == 0 {
      // Distinguish a missing report from a lost race.
      return match self.fetch_report(id).await? {
        Some(_) => Err(CoreError::AlreadyClaimed(id)),
        None => Err(CoreError::ReportNotFound(id)),
      };
    }

    let raw = self
      .fetch_report(id)
      .await?
      .ok_or(CoreError::ReportNotFound(id))?;
    Ok(raw.into_report()?)
  }

  async fn mark_read(&self, id: Uuid) -> CoreResult<()> {
    let id_str = encode_uuid(id);
    let rows = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE reports SET read = 1 WHERE report_id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await
      .map_err(Error::Database)?;

    if rows == 0 {
      return Err(CoreError::ReportNotFound(id));
    }
    Ok(())
  }
}
