//! Admin commands: session lifecycle, the gem dashboard, and toggles

use colored::Colorize;
use dialoguer::{theme::ColorfulTheme, Password};

use crate::commands::usage_commands::{print_summary_block, print_top_gems};
use crate::commands::{date_part, format_number, spark, truncate, OutputFormat, SPARK_DAYS};
use crate::error::{AppError, AppResult};
use crate::services::{aggregate_by_gem, build_table_rows, clamp_days, pct, window_recent};
use crate::types::{AdminUsageResponse, EnabledFilter, GemTableRow, SessionState, TableSort};
use crate::AppState;

/// Window used to warm the dashboard right after login
const WARM_DAYS: u32 = 30;

/// Authenticate the admin session, prompting for the password when it was
/// not passed on the command line
pub async fn run_admin_login(
    state: &AppState,
    team_id: Option<&str>,
    password: Option<&str>,
    format: OutputFormat,
) -> AppResult<()> {
    let password = match password {
        Some(p) => p.to_string(),
        None => Password::with_theme(&ColorfulTheme::default())
            .with_prompt("Admin password")
            .interact()
            .map_err(|e| AppError::Internal(format!("password prompt failed: {}", e)))?,
    };

    state.session_service.login(&password).await?;

    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&state.session_service.status())?
            );
        }
        OutputFormat::Table => println!("{}", "Logged in.".green()),
    }

    // Warm the dashboard caches; a failed warm only skips the summary line.
    let gems = state.gem_service.refresh_admin_gems(team_id);
    let usage = state.usage_service.refresh_admin_usage(team_id, WARM_DAYS);
    match tokio::join!(gems, usage) {
        (Ok(gems), Ok(usage)) => {
            if format == OutputFormat::Table {
                println!(
                    "{}",
                    format!(
                        "{} gems, {} runs in the last {} days",
                        gems.len(),
                        format_number(usage.summary.total_count),
                        usage.days
                    )
                    .dimmed()
                );
            }
        }
        (gems, usage) => {
            if let Err(err) = gems {
                tracing::debug!(error = %err, "post-login gem warm failed");
            }
            if let Err(err) = usage {
                tracing::debug!(error = %err, "post-login usage warm failed");
            }
        }
    }

    Ok(())
}

/// End the admin session and drop every cached gem and usage view
pub async fn run_admin_logout(state: &AppState, format: OutputFormat) -> AppResult<()> {
    state.session_service.logout().await;

    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&state.session_service.status())?
            );
        }
        OutputFormat::Table => println!("{}", "Logged out.".green()),
    }

    Ok(())
}

/// Probe the server for an existing session and report the result
pub async fn run_admin_status(state: &AppState, format: OutputFormat) -> AppResult<()> {
    let probe = state.session_service.restore().await;
    let status = state.session_service.status();

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    match probe {
        Err(err) => println!("{}", format!("Admin probe failed: {}", err).yellow()),
        Ok(p) if !p.enabled => println!(
            "{}",
            "Admin features are not configured on this server.".yellow()
        ),
        Ok(_) => {}
    }

    let word = match status.state {
        SessionState::Authenticated => "authenticated".green(),
        other => other.as_str().yellow(),
    };
    println!("{} {}", format!("{:<12}", "Session").dimmed(), word);

    Ok(())
}

/// Render the admin dashboard: every gem joined with its usage aggregate,
/// filtered, searched, and sorted
#[allow(clippy::too_many_arguments)]
pub async fn run_admin_gems(
    state: &AppState,
    team_id: Option<&str>,
    days: u32,
    filter: EnabledFilter,
    query: &str,
    sort: TableSort,
    format: OutputFormat,
) -> AppResult<()> {
    let days = clamp_days(days);

    let gems = state.gem_service.refresh_admin_gems(team_id);
    let usage = state.usage_service.refresh_admin_usage(team_id, days);
    let (gems, usage) = match tokio::join!(gems, usage) {
        (Ok(gems), Ok(usage)) => (gems, usage),
        (Err(err), _) => return or_login_hint(err.into()),
        (_, Err(err)) => return or_login_hint(err.into()),
    };

    let aggregates = aggregate_by_gem(&usage.by_gem_day);
    let rows = build_table_rows(&gems, &aggregates, filter, query, sort);

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
        OutputFormat::Table => print_dashboard(&rows, &usage, filter, query),
    }

    Ok(())
}

/// Flip one gem's enabled flag
pub async fn run_admin_toggle(
    state: &AppState,
    name: &str,
    enabled: bool,
    team_id: Option<&str>,
    format: OutputFormat,
) -> AppResult<()> {
    let updated = match state.gem_service.set_enabled(name, enabled, team_id).await {
        Ok(updated) => updated,
        Err(err) => return or_login_hint(err.into()),
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&updated)?),
        OutputFormat::Table => {
            let word = if updated.enabled {
                "enabled".green()
            } else {
                "disabled".red()
            };
            println!("{} is now {}", updated.name.bold(), word);
        }
    }

    Ok(())
}

/// Show the admin usage window: summary, per-day breakdown, top gems
pub async fn run_admin_usage(
    state: &AppState,
    team_id: Option<&str>,
    days: u32,
    format: OutputFormat,
) -> AppResult<()> {
    let usage = match state
        .usage_service
        .refresh_admin_usage(team_id, clamp_days(days))
        .await
    {
        Ok(usage) => usage,
        Err(err) => return or_login_hint(err.into()),
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&usage)?),
        OutputFormat::Table => print_admin_usage(&usage),
    }

    Ok(())
}

// Admin views fall back to a login hint on a 401 instead of erroring out.
fn or_login_hint(err: AppError) -> AppResult<()> {
    if err.is_unauthorized() {
        println!(
            "{}",
            "Not authenticated. Run `gemsrack-console admin login` first.".yellow()
        );
        Ok(())
    } else {
        Err(err)
    }
}

fn print_dashboard(
    rows: &[GemTableRow],
    usage: &AdminUsageResponse,
    filter: EnabledFilter,
    query: &str,
) {
    println!(
        "\n{}",
        format!("Gem dashboard, last {} days", usage.days)
            .bold()
            .cyan()
    );

    let mut scope = vec![format!("team {}", usage.team_id)];
    if filter != EnabledFilter::All {
        scope.push(format!("{} only", filter.as_str()));
    }
    let query = query.trim();
    if !query.is_empty() {
        scope.push(format!("matching \"{}\"", query));
    }
    println!("{}", scope.join(", ").dimmed());
    println!("{}", "=".repeat(92));

    if rows.is_empty() {
        println!("{}", "No gems match.".yellow());
        return;
    }

    // Date axis for the per-row trend column, shared across all rows.
    let dates: Vec<String> = window_recent(&usage.summary.by_day, SPARK_DAYS)
        .iter()
        .map(|d| d.date.clone())
        .collect();

    println!(
        "{}",
        format!(
            "{:<26} {:<9} {:>8} {:>6} {:>6} {:>6}  {:<8} {}",
            "NAME", "STATE", "RUNS", "PUB", "OK", "ERR", "TREND", "UPDATED"
        )
        .bold()
    );

    for row in rows {
        let word = if row.enabled { "enabled" } else { "disabled" };
        let line = format!(
            "{:<26} {:<9} {:>8} {:>6} {:>6} {:>6}  {:<8} {}",
            truncate(&row.name, 25),
            word,
            format_number(row.count),
            pct(row.public_count, row.count),
            pct(row.ok_count, row.count),
            pct(row.error_count, row.count),
            row_trend(row, &dates),
            date_part(&row.updated_at),
        );
        if row.enabled {
            println!("{}", line);
        } else {
            println!("{}", line.dimmed());
        }
    }
    println!();
}

fn row_trend(row: &GemTableRow, dates: &[String]) -> String {
    let counts: Vec<u64> = dates
        .iter()
        .map(|d| row.by_day.get(d).copied().unwrap_or(0))
        .collect();
    spark(&counts)
}

fn print_admin_usage(usage: &AdminUsageResponse) {
    println!(
        "\n{}",
        format!(
            "Admin usage for team {}, last {} days",
            usage.team_id, usage.days
        )
        .bold()
        .cyan()
    );
    println!("{}", "=".repeat(60));

    print_summary_block(&usage.summary);

    if !usage.summary.by_day.is_empty() {
        println!("\n{}", "By day".bold());
        println!(
            "{}",
            format!(
                "{:<12} {:>8} {:>8} {:>8} {:>8}",
                "DATE", "RUNS", "PUBLIC", "OK", "ERRORS"
            )
            .bold()
        );
        for (i, day) in usage.summary.by_day.iter().enumerate() {
            let line = format!(
                "{:<12} {:>8} {:>8} {:>8} {:>8}",
                day.date,
                format_number(day.total_count),
                format_number(day.public_count),
                format_number(day.ok_count),
                format_number(day.error_count),
            );
            if i % 2 == 0 {
                println!("{}", line);
            } else {
                println!("{}", line.dimmed());
            }
        }
    }

    print_top_gems(&usage.summary.top_gems);
    println!();
}
