//! Test fixtures and data factories
//!
//! This module provides factory functions for creating test data.

use fake::faker::lorem::en::Sentence;
use fake::Fake;

use gemsrack_console_lib::types::GemUsageRow;

use super::mocks::StubGem;

/// Create an enabled test gem with default values
pub fn create_gem(name: &str) -> StubGem {
    let now = chrono::Utc::now().to_rfc3339();
    StubGem {
        name: name.to_string(),
        summary: Sentence(3..8).fake(),
        enabled: true,
        input_format: "text".to_string(),
        output_format: "markdown".to_string(),
        body: format!("You are the {} gem.", name),
        system_prompt: "Answer concisely.".to_string(),
        created_at: now.clone(),
        updated_at: now,
    }
}

/// Create a test gem with a fixed summary
pub fn create_gem_with_summary(name: &str, summary: &str) -> StubGem {
    let mut gem = create_gem(name);
    gem.summary = summary.to_string();
    gem
}

/// Create a disabled test gem
pub fn create_disabled_gem(name: &str) -> StubGem {
    let mut gem = create_gem(name);
    gem.enabled = false;
    gem
}

/// Create a usage row with explicit counters
pub fn create_usage_row(
    date: &str,
    gem_name: &str,
    count: u64,
    public_count: u64,
    ok_count: u64,
    error_count: u64,
) -> GemUsageRow {
    GemUsageRow {
        date: date.to_string(),
        gem_name: gem_name.to_string(),
        count,
        public_count,
        ok_count,
        error_count,
    }
}

/// Randomized usage rows covering the last `days` dates for each gem.
///
/// Counters stay internally consistent: ok + error = count and
/// public <= count, so aggregate invariants hold over the output.
pub fn create_usage_history(gems: &[&str], days: usize) -> Vec<GemUsageRow> {
    let today = chrono::Utc::now().date_naive();
    let mut rows = Vec::new();

    for offset in (0..days).rev() {
        let date = (today - chrono::Duration::days(offset as i64))
            .format("%Y-%m-%d")
            .to_string();
        for gem in gems {
            let count: u64 = (1..80u64).fake();
            let error_count: u64 = (0..count / 4 + 1).fake();
            let public_count: u64 = (0..=count).fake();
            rows.push(GemUsageRow {
                date: date.clone(),
                gem_name: (*gem).to_string(),
                count,
                public_count,
                ok_count: count - error_count,
                error_count,
            });
        }
    }

    rows
}
