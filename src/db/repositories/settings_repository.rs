//! Settings repository for persisted console configuration

use rusqlite::params;

use crate::db::{DbPool, DbResult};

/// Setting key for the selected team
pub const SETTING_TEAM_ID: &str = "team_id";
/// Setting key for the API base URL
pub const SETTING_BASE_URL: &str = "base_url";

/// Keys the console reads at startup
pub const KNOWN_SETTINGS: &[&str] = &[SETTING_TEAM_ID, SETTING_BASE_URL];

/// Key-value store backing the console's persisted configuration.
///
/// Injected at startup so data-fetching code never reaches for ambient
/// global state.
#[cfg_attr(test, mockall::automock)]
pub trait SettingsStore: Send + Sync {
    fn get(&self, key: &str) -> DbResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> DbResult<()>;
    fn remove(&self, key: &str) -> DbResult<()>;
    fn entries(&self) -> DbResult<Vec<(String, String)>>;
}

pub struct SettingsRepository {
    pool: DbPool,
}

impl SettingsRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl SettingsStore for SettingsRepository {
    fn get(&self, key: &str) -> DbResult<Option<String>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare("SELECT value FROM settings WHERE key = ?")?;

        let value = stmt.query_row([key], |row| row.get(0)).optional()?;

        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> DbResult<()> {
        let conn = self.pool.get()?;
        conn.execute(
            r#"
            INSERT INTO settings (key, value, updated_at)
            VALUES (?, ?, datetime('now'))
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = datetime('now')
        "#,
            params![key, value],
        )?;

        Ok(())
    }

    fn remove(&self, key: &str) -> DbResult<()> {
        let conn = self.pool.get()?;
        conn.execute("DELETE FROM settings WHERE key = ?", [key])?;

        Ok(())
    }

    fn entries(&self) -> DbResult<Vec<(String, String)>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare("SELECT key, value FROM settings ORDER BY key")?;

        let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
        let entries: Vec<(String, String)> = rows.filter_map(|r| r.ok()).collect();

        Ok(entries)
    }
}

// Helper trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>, rusqlite::Error>;
}

impl<T> OptionalExt<T> for Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>, rusqlite::Error> {
        match self {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
