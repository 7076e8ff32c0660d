//! Repository implementations for data access

pub mod settings_repository;

pub use settings_repository::{
    SettingsRepository, SettingsStore, KNOWN_SETTINGS, SETTING_BASE_URL, SETTING_TEAM_ID,
};

#[cfg(test)]
pub use settings_repository::MockSettingsStore;
