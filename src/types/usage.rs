//! Usage analytics type definitions

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One day's execution counters for one gem, as reported by the admin API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GemUsageRow {
    pub date: String,
    pub gem_name: String,
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub public_count: u64,
    #[serde(default)]
    pub ok_count: u64,
    #[serde(default)]
    pub error_count: u64,
}

/// Counters summed across all gems for one date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyTotal {
    pub date: String,
    #[serde(default)]
    pub total_count: u64,
    #[serde(default)]
    pub public_count: u64,
    #[serde(default)]
    pub ok_count: u64,
    #[serde(default)]
    pub error_count: u64,
}

/// Counters summed across all dates for one gem, with a per-date lookup
/// for sparkline rendering
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GemAggregate {
    pub count: u64,
    pub public_count: u64,
    pub ok_count: u64,
    pub error_count: u64,
    pub by_day: BTreeMap<String, u64>,
}

/// One entry of the top-gems ranking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopGem {
    pub gem_name: String,
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub public_count: u64,
    #[serde(default)]
    pub ok_count: u64,
    #[serde(default)]
    pub error_count: u64,
}

/// Window totals plus the daily series and top-gems ranking
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageSummary {
    #[serde(default)]
    pub from_date: String,
    #[serde(default)]
    pub to_date: String,
    #[serde(default)]
    pub total_count: u64,
    #[serde(default)]
    pub public_count: u64,
    #[serde(default)]
    pub ok_count: u64,
    #[serde(default)]
    pub error_count: u64,
    #[serde(default)]
    pub by_day: Vec<DailyTotal>,
    #[serde(default)]
    pub top_gems: Vec<TopGem>,
}

/// Response for `GET /api/metrics/gem-usage` (summary fields are flat on the wire)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamUsageResponse {
    pub team_id: String,
    pub days: u32,
    #[serde(flatten)]
    pub summary: UsageSummary,
}

/// Response for `GET /api/admin/usage`: summary plus the raw per-gem-per-day rows
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminUsageResponse {
    pub team_id: String,
    pub days: u32,
    pub summary: UsageSummary,
    pub by_gem_day: Vec<GemUsageRow>,
}
