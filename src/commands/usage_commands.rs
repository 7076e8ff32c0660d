//! Team usage analytics command

use colored::Colorize;

use crate::commands::{format_number, spark, truncate, OutputFormat, SPARK_DAYS};
use crate::error::AppResult;
use crate::services::{clamp_days, pct, window_recent};
use crate::types::{TeamUsageResponse, TopGem, UsageSummary};
use crate::AppState;

/// Show the team-wide usage summary for the requested window
pub async fn run_usage(
    state: &AppState,
    team_id: Option<&str>,
    days: u32,
    limit: Option<u32>,
    format: OutputFormat,
) -> AppResult<()> {
    let usage = state
        .usage_service
        .refresh_team_usage(team_id, clamp_days(days), limit)
        .await?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&usage)?),
        OutputFormat::Table => print_usage_summary(&usage),
    }

    Ok(())
}

fn print_usage_summary(usage: &TeamUsageResponse) {
    println!(
        "\n{}",
        format!("Usage for team {}, last {} days", usage.team_id, usage.days)
            .bold()
            .cyan()
    );
    println!("{}", "=".repeat(60));

    print_summary_block(&usage.summary);
    print_top_gems(&usage.summary.top_gems);
    println!();
}

/// Headline counters, rates, and the recent-days sparkline
pub(crate) fn print_summary_block(summary: &UsageSummary) {
    if !summary.from_date.is_empty() {
        println!(
            "{}",
            format!("{} to {}", summary.from_date, summary.to_date).dimmed()
        );
    }

    print_counter("Total runs", summary.total_count, None);
    print_counter(
        "Public",
        summary.public_count,
        Some(pct(summary.public_count, summary.total_count)),
    );
    print_counter(
        "Succeeded",
        summary.ok_count,
        Some(pct(summary.ok_count, summary.total_count)),
    );
    print_counter(
        "Errored",
        summary.error_count,
        Some(pct(summary.error_count, summary.total_count)),
    );

    let recent = window_recent(&summary.by_day, SPARK_DAYS);
    if !recent.is_empty() {
        let counts: Vec<u64> = recent.iter().map(|d| d.total_count).collect();
        println!(
            "{} {}  {}",
            format!("{:<12}", "Recent").dimmed(),
            spark(&counts),
            format!("{} to {}", recent[0].date, recent[recent.len() - 1].date).dimmed()
        );
    }
}

pub(crate) fn print_top_gems(top_gems: &[TopGem]) {
    if top_gems.is_empty() {
        return;
    }

    println!("\n{}", "Top gems".bold());
    println!(
        "{}",
        format!(
            "{:<4} {:<26} {:>8} {:>6} {:>8}",
            "#", "NAME", "RUNS", "OK", "ERRORS"
        )
        .bold()
    );
    for (i, gem) in top_gems.iter().enumerate() {
        let line = format!(
            "{:<4} {:<26} {:>8} {:>6} {:>8}",
            i + 1,
            truncate(&gem.gem_name, 25),
            format_number(gem.count),
            pct(gem.ok_count, gem.count),
            format_number(gem.error_count),
        );
        if i % 2 == 0 {
            println!("{}", line);
        } else {
            println!("{}", line.dimmed());
        }
    }
}

fn print_counter(label: &str, value: u64, rate: Option<String>) {
    match rate {
        Some(rate) => println!(
            "{} {:>10} ({})",
            format!("{:<12}", label).dimmed(),
            format_number(value),
            rate
        ),
        None => println!(
            "{} {:>10}",
            format!("{:<12}", label).dimmed(),
            format_number(value)
        ),
    }
}
