//! Persisted console settings commands

use colored::Colorize;

use crate::commands::OutputFormat;
use crate::db::{SettingsStore, KNOWN_SETTINGS, SETTING_BASE_URL, SETTING_TEAM_ID};
use crate::error::{AppError, AppResult};
use crate::services::DEFAULT_BASE_URL;

/// Print every stored setting
pub fn run_config_show(settings: &dyn SettingsStore, format: OutputFormat) -> AppResult<()> {
    let entries = settings.entries()?;

    match format {
        OutputFormat::Json => {
            let map: serde_json::Map<String, serde_json::Value> = entries
                .into_iter()
                .map(|(k, v)| (k, serde_json::Value::String(v)))
                .collect();
            println!("{}", serde_json::to_string_pretty(&map)?);
        }
        OutputFormat::Table => {
            if entries.is_empty() {
                println!("{}", "No settings stored.".dimmed());
                return Ok(());
            }
            for (key, value) in &entries {
                println!("{} {}", format!("{:<12}", key).dimmed(), value);
            }
        }
    }

    Ok(())
}

/// Store one setting
pub fn run_config_set(settings: &dyn SettingsStore, key: &str, value: &str) -> AppResult<()> {
    let key = normalize_key(key)?;
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::Validation(
            "value must not be empty".to_string(),
        ));
    }

    settings.set(&key, value)?;
    println!("{} = {}", key.bold(), value);

    Ok(())
}

/// Remove one setting
pub fn run_config_unset(settings: &dyn SettingsStore, key: &str) -> AppResult<()> {
    let key = normalize_key(key)?;
    settings.remove(&key)?;
    println!("{} cleared", key.bold());

    Ok(())
}

/// Resolve the API base URL: explicit flag first, then the stored setting,
/// then the built-in default
pub fn resolve_base_url(flag: Option<&str>, settings: &dyn SettingsStore) -> AppResult<String> {
    if let Some(url) = non_blank(flag) {
        return Ok(url);
    }
    if let Some(url) = settings.get(SETTING_BASE_URL)? {
        return Ok(url);
    }
    Ok(DEFAULT_BASE_URL.to_string())
}

/// Resolve the team: explicit flag first, then the stored setting
pub fn resolve_team_id(
    flag: Option<&str>,
    settings: &dyn SettingsStore,
) -> AppResult<Option<String>> {
    if let Some(team) = non_blank(flag) {
        return Ok(Some(team));
    }
    Ok(settings.get(SETTING_TEAM_ID)?)
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

// Accepts "team-id" for "team_id" so the key matches the flag spelling.
fn normalize_key(key: &str) -> AppResult<String> {
    let key = key.trim().to_lowercase().replace('-', "_");
    if KNOWN_SETTINGS.contains(&key.as_str()) {
        Ok(key)
    } else {
        Err(AppError::Validation(format!(
            "unknown setting \"{}\" (known: {})",
            key,
            KNOWN_SETTINGS.join(", ")
        )))
    }
}
