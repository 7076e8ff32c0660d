//! Server health probe command

use colored::Colorize;

use crate::commands::OutputFormat;
use crate::error::AppResult;
use crate::AppState;

/// Ping the server's health endpoint; a failing probe exits non-zero
pub async fn run_health(state: &AppState, format: OutputFormat) -> AppResult<()> {
    let base_url = state.api_service.base_url().to_string();
    let body = state.api_service.health().await?;
    let status = body.trim().to_string();

    match format {
        OutputFormat::Json => {
            let value = serde_json::json!({ "base_url": base_url, "status": status });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        OutputFormat::Table => println!("{} {}", base_url.bold(), status.green()),
    }

    Ok(())
}
