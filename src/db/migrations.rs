//! Settings database migrations
//!
//! Applied versions are recorded in `schema_migrations`, so running the
//! migration set again at startup is a no-op.

use rusqlite::Connection;

use super::DbResult;

const MIGRATIONS: &[(i64, &str, &str)] =
    &[(1, "settings", include_str!("migrations/001_settings.sql"))];

/// Apply any migrations not yet recorded
pub fn run_migrations(conn: &Connection) -> DbResult<()> {
    conn.execute(
        r#"
        CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )
    "#,
        [],
    )?;

    for (version, name, sql) in MIGRATIONS.iter().copied() {
        let applied: bool = conn
            .query_row(
                "SELECT COUNT(*) > 0 FROM schema_migrations WHERE version = ?",
                [version],
                |row| row.get(0),
            )
            .unwrap_or(false);
        if applied {
            continue;
        }

        tracing::info!("Applying settings migration {}: {}", version, name);
        conn.execute_batch(sql)?;
        conn.execute(
            "INSERT INTO schema_migrations (version, name) VALUES (?, ?)",
            rusqlite::params![version, name],
        )?;
    }

    Ok(())
}
