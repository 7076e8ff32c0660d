//! Database layer for the Gemsrack console
//!
//! This module provides connection management, migrations, and the
//! repository backing the persisted console settings.

pub mod connection;
pub mod migrations;
pub mod repositories;

pub use connection::{init_database, DbError, DbPool, DbResult};
pub use repositories::{
    SettingsRepository, SettingsStore, KNOWN_SETTINGS, SETTING_BASE_URL, SETTING_TEAM_ID,
};

#[cfg(test)]
pub use repositories::MockSettingsStore;
