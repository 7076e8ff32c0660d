//! Public gem catalog commands

use colored::Colorize;

use crate::commands::{date_part, format_age, truncate, OutputFormat};
use crate::error::{AppError, AppResult};
use crate::services::GemError;
use crate::types::{GemDetail, GemSummary};
use crate::AppState;

/// List the public catalog, optionally narrowed by a search query
pub async fn run_gems_list(
    state: &AppState,
    team_id: Option<&str>,
    limit: Option<u32>,
    query: &str,
    format: OutputFormat,
) -> AppResult<()> {
    state.gem_service.refresh_gems(team_id, limit).await?;
    let total = state.gem_service.cached_gems().len();
    let gems = state.gem_service.filtered_gems(query);

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&gems)?),
        OutputFormat::Table => print_gem_table(&gems, total, query),
    }

    Ok(())
}

/// Show one gem in full, including its prompt bodies
pub async fn run_gems_show(
    state: &AppState,
    name: &str,
    team_id: Option<&str>,
    format: OutputFormat,
) -> AppResult<()> {
    let gem = match state.gem_service.gem_detail(name, team_id).await {
        Ok(gem) => gem,
        // A 404 here deserves a plain answer, not the raw status line.
        Err(GemError::Api(ref api)) if api.is_not_found() => {
            return Err(AppError::NotFound(format!("gem \"{}\"", name.trim())));
        }
        Err(err) => return Err(err.into()),
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&gem)?),
        OutputFormat::Table => print_gem_detail(&gem),
    }

    Ok(())
}

fn print_gem_table(gems: &[GemSummary], total: usize, query: &str) {
    let query = query.trim();
    if gems.is_empty() {
        if query.is_empty() {
            println!("{}", "No gems in the catalog.".yellow());
        } else {
            println!("{}", format!("No gems match \"{}\".", query).yellow());
        }
        return;
    }

    let heading = if query.is_empty() {
        format!("Gems ({})", total)
    } else {
        format!("Gems ({} of {} matching \"{}\")", gems.len(), total, query)
    };
    println!("\n{}", heading.bold().cyan());
    println!("{}", "=".repeat(92));
    println!(
        "{}",
        format!(
            "{:<26} {:<16} {:<12} {}",
            "NAME", "IN / OUT", "UPDATED", "SUMMARY"
        )
        .bold()
    );

    for (i, gem) in gems.iter().enumerate() {
        let formats = format!("{} / {}", gem.input_format, gem.output_format);
        let line = format!(
            "{:<26} {:<16} {:<12} {}",
            truncate(&gem.name, 25),
            truncate(&formats, 15),
            date_part(&gem.updated_at),
            truncate(&gem.summary, 44),
        );
        if i % 2 == 0 {
            println!("{}", line);
        } else {
            println!("{}", line.dimmed());
        }
    }
    println!();
}

fn print_gem_detail(gem: &GemDetail) {
    let meta = &gem.summary;

    println!("\n{}", meta.name.bold().cyan());
    if !meta.summary.is_empty() {
        println!("{}", meta.summary);
    }
    println!("{}", "=".repeat(60));

    print_field("Team", &meta.team_id);
    print_field("Input", &meta.input_format);
    print_field("Output", &meta.output_format);
    let status = if meta.enabled {
        "enabled".green()
    } else {
        "disabled".red()
    };
    println!("{} {}", format!("{:<12}", "Status").dimmed(), status);
    if let Some(author) = &meta.created_by {
        print_field("Created by", author);
    }
    print_field("Created", date_part(&meta.created_at));
    match format_age(&meta.updated_at) {
        Some(age) => print_field("Updated", &format!("{} ({})", date_part(&meta.updated_at), age)),
        None => print_field("Updated", &meta.updated_at),
    }

    if !gem.body.is_empty() {
        println!("\n{}", "Prompt".bold());
        println!("{}", "-".repeat(60));
        println!("{}", gem.body);
    }
    if !gem.system_prompt.is_empty() {
        println!("\n{}", "System prompt".bold());
        println!("{}", "-".repeat(60));
        println!("{}", gem.system_prompt);
    }
    println!();
}

fn print_field(label: &str, value: &str) {
    if !value.is_empty() {
        println!("{} {}", format!("{:<12}", label).dimmed(), value);
    }
}
