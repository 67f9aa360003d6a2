use crate::Database;
use crate::models::{FeedbackRow, FormRow, PageCursor};
use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use feedback_types::models::{FeedbackRecord, NewFeedback};
use rusqlite::{Connection, OptionalExtension};
use uuid::Uuid;

const FEEDBACK_COLUMNS: &str = "id, form_id, message, image_url, image_name, image_size, \
     operating_system, screen_category, user_id, user_email, user_name, created_at";

impl Database {
    // -- Forms --

    pub fn create_form(&self, id: &str, url: &str) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute("INSERT INTO forms (id, url) VALUES (?1, ?2)", (id, url))?;
            Ok(())
        })
    }

    pub fn get_form(&self, id: &str) -> Result<Option<FormRow>> {
        self.with_conn(|conn| query_form(conn, id))
    }

    // -- Notification settings --

    /// Insert or replace the setting for (form, email).
    pub fn set_notification_setting(&self, form_id: &str, email: &str, enabled: bool) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO notification_settings (form_id, email, enabled) VALUES (?1, ?2, ?3)
                 ON CONFLICT(form_id, email) DO UPDATE SET enabled = excluded.enabled",
                rusqlite::params![form_id, email, enabled],
            )?;
            Ok(())
        })
    }

    pub fn enabled_recipients(&self, form_id: &str) -> Result<Vec<String>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT email FROM notification_settings
                 WHERE form_id = ?1 AND enabled = 1
                 ORDER BY email",
            )?;
            let emails = stmt
                .query_map([form_id], |row| row.get::<_, String>(0))?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(emails)
        })
    }

    // -- Feedback --

    /// Insert one feedback row. The id and `created_at` are assigned here.
    pub fn insert_feedback(&self, feedback: &NewFeedback) -> Result<FeedbackRecord> {
        let id = Uuid::new_v4();

        let created_at: String = self.with_conn_mut(|conn| {
            let created_at = conn.query_row(
                "INSERT INTO feedback (id, form_id, message, image_url, image_name, image_size,
                                       operating_system, screen_category, user_id, user_email, user_name)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
                 RETURNING created_at",
                rusqlite::params![
                    id.to_string(),
                    feedback.form_id,
                    feedback.message,
                    feedback.image_url,
                    feedback.image_name,
                    feedback.image_size,
                    feedback.operating_system,
                    feedback.screen_category,
                    feedback.user_id,
                    feedback.user_email,
                    feedback.user_name,
                ],
                |row| row.get(0),
            )?;
            Ok(created_at)
        })?;

        Ok(FeedbackRecord {
            id,
            form_id: feedback.form_id.clone(),
            message: feedback.message.clone(),
            image_url: feedback.image_url.clone(),
            image_name: feedback.image_name.clone(),
            image_size: feedback.image_size,
            operating_system: feedback.operating_system.clone(),
            screen_category: feedback.screen_category.clone(),
            user_id: feedback.user_id.clone(),
            user_email: feedback.user_email.clone(),
            user_name: feedback.user_name.clone(),
            created_at: parse_timestamp(&created_at)?,
        })
    }

    /// Newest-first page of feedback for a form. `before` points at the
    /// oldest record on the previous page.
    pub fn list_feedback(
        &self,
        form_id: &str,
        limit: u32,
        before: Option<&PageCursor>,
    ) -> Result<Vec<FeedbackRecord>> {
        let rows = self.with_conn(|conn| query_feedback(conn, form_id, limit, before))?;
        rows.into_iter().map(FeedbackRecord::try_from).collect()
    }
}

impl TryFrom<FeedbackRow> for FeedbackRecord {
    type Error = anyhow::Error;

    fn try_from(row: FeedbackRow) -> Result<Self> {
        Ok(Self {
            id: row
                .id
                .parse()
                .with_context(|| format!("Corrupt feedback id '{}'", row.id))?,
            created_at: parse_timestamp(&row.created_at)?,
            form_id: row.form_id,
            message: row.message,
            image_url: row.image_url,
            image_name: row.image_name,
            image_size: row.image_size,
            operating_system: row.operating_system,
            screen_category: row.screen_category,
            user_id: row.user_id,
            user_email: row.user_email,
            user_name: row.user_name,
        })
    }
}

/// Same text the `created_at` column default produces, so cursors compare
/// correctly against stored values.
fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

/// Rows written by this crate are RFC 3339; rows seeded by hand with
/// `datetime('now')` are naive UTC.
fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    raw.parse::<DateTime<Utc>>()
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc()))
        .with_context(|| format!("Corrupt timestamp '{}'", raw))
}

fn query_form(conn: &Connection, id: &str) -> Result<Option<FormRow>> {
    let mut stmt = conn.prepare("SELECT id, url FROM forms WHERE id = ?1")?;

    let row = stmt
        .query_row([id], |row| {
            Ok(FormRow {
                id: row.get(0)?,
                url: row.get(1)?,
            })
        })
        .optional()?;

    Ok(row)
}

fn query_feedback(
    conn: &Connection,
    form_id: &str,
    limit: u32,
    before: Option<&PageCursor>,
) -> Result<Vec<FeedbackRow>> {
    let sql = format!(
        "SELECT {FEEDBACK_COLUMNS} FROM feedback
         WHERE form_id = ?1
           AND (?2 IS NULL
                OR created_at < ?2
                OR (created_at = ?2 AND ?3 IS NOT NULL AND id < ?3))
         ORDER BY created_at DESC, id DESC
         LIMIT ?4"
    );
    let mut stmt = conn.prepare(&sql)?;

    let before_at = before.map(|c| format_timestamp(&c.created_at));
    let before_id = before.and_then(|c| c.id).map(|id| id.to_string());

    let rows = stmt
        .query_map(rusqlite::params![form_id, before_at, before_id, limit], |row| {
            Ok(FeedbackRow {
                id: row.get(0)?,
                form_id: row.get(1)?,
                message: row.get(2)?,
                image_url: row.get(3)?,
                image_name: row.get(4)?,
                image_size: row.get(5)?,
                operating_system: row.get(6)?,
                screen_category: row.get(7)?,
                user_id: row.get(8)?,
                user_email: row.get(9)?,
                user_name: row.get(10)?,
                created_at: row.get(11)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}
