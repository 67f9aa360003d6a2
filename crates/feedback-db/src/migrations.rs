use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    let version: i64 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |r| r.get(0),
    )?;

    if version < 1 {
        info!("Running migration v1 (forms, feedback, notification settings)");
        conn.execute_batch(
            "
            CREATE TABLE forms (
                id          TEXT PRIMARY KEY,
                url         TEXT NOT NULL,
                created_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
            );

            CREATE TABLE feedback (
                id                TEXT PRIMARY KEY,
                form_id           TEXT NOT NULL REFERENCES forms(id),
                message           TEXT NOT NULL,
                image_url         TEXT,
                image_name        TEXT,
                image_size        INTEGER,
                operating_system  TEXT NOT NULL DEFAULT 'Unknown',
                screen_category   TEXT NOT NULL DEFAULT 'Unknown',
                user_id           TEXT,
                user_email        TEXT,
                user_name         TEXT,
                created_at        TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
            );

            CREATE INDEX idx_feedback_form
                ON feedback(form_id, created_at);

            CREATE TABLE notification_settings (
                form_id     TEXT NOT NULL REFERENCES forms(id),
                email       TEXT NOT NULL,
                enabled     INTEGER NOT NULL DEFAULT 1,
                PRIMARY KEY (form_id, email)
            );

            INSERT INTO schema_version (version) VALUES (1);
            ",
        )?;
    }

    info!("Database migrations complete");
    Ok(())
}
