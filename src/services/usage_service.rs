//! Usage analytics: client-side aggregation plus fetch/cache plumbing
//!
//! The aggregation functions are pure and total: any well-typed row set,
//! including an empty one, produces a result without panicking. Duplicate
//! `(date, gem_name)` pairs are summed, never overwritten.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use parking_lot::RwLock;
use thiserror::Error;

use crate::services::api_service::{ApiError, ApiService};
use crate::services::fetch::FetchSlot;
use crate::types::{
    AdminGem, AdminUsageResponse, DailyTotal, EnabledFilter, GemAggregate, GemTableRow,
    GemUsageRow, TableSort, TeamUsageResponse,
};

/// Sentinel shown where a rate has no denominator
pub const NO_RATE: &str = "—";

/// Integer percentage of `numerator / denominator`, e.g. `"33%"`.
///
/// Returns [`NO_RATE`] when the denominator is zero; never divides by zero.
pub fn pct(numerator: u64, denominator: u64) -> String {
    if denominator == 0 {
        return NO_RATE.to_string();
    }
    let rate = (numerator as f64 / denominator as f64) * 100.0;
    format!("{}%", rate.round() as u64)
}

/// Sum rows into one [`DailyTotal`] per distinct date, ascending by date.
///
/// Dates absent from the input produce no entry; there is no zero-filling.
pub fn aggregate_by_day(rows: &[GemUsageRow]) -> Vec<DailyTotal> {
    let mut days: BTreeMap<String, DailyTotal> = BTreeMap::new();

    for row in rows {
        let total = days.entry(row.date.clone()).or_insert_with(|| DailyTotal {
            date: row.date.clone(),
            total_count: 0,
            public_count: 0,
            ok_count: 0,
            error_count: 0,
        });
        total.total_count = total.total_count.saturating_add(row.count);
        total.public_count = total.public_count.saturating_add(row.public_count);
        total.ok_count = total.ok_count.saturating_add(row.ok_count);
        total.error_count = total.error_count.saturating_add(row.error_count);
    }

    // ISO dates sort lexicographically, so BTreeMap order is chronological.
    days.into_values().collect()
}

/// Sum rows into one [`GemAggregate`] per gem, with a per-date count lookup
pub fn aggregate_by_gem(rows: &[GemUsageRow]) -> HashMap<String, GemAggregate> {
    let mut gems: HashMap<String, GemAggregate> = HashMap::new();

    for row in rows {
        let agg = gems.entry(row.gem_name.clone()).or_default();
        agg.count = agg.count.saturating_add(row.count);
        agg.public_count = agg.public_count.saturating_add(row.public_count);
        agg.ok_count = agg.ok_count.saturating_add(row.ok_count);
        agg.error_count = agg.error_count.saturating_add(row.error_count);

        let day = agg.by_day.entry(row.date.clone()).or_insert(0);
        *day = day.saturating_add(row.count);
    }

    gems
}

/// Last `n` entries of a date-ordered series, by position.
///
/// A series shorter than `n` is returned whole.
pub fn window_recent<T: Clone>(series: &[T], n: usize) -> Vec<T> {
    let start = series.len().saturating_sub(n);
    series[start..].to_vec()
}

/// Join gems with their aggregates into dashboard rows, then filter and sort.
///
/// Pipeline order: join (zero-valued aggregate when absent), enabled-state
/// filter, case-insensitive query match against `name + " " + summary`,
/// sort.
pub fn build_table_rows(
    gems: &[AdminGem],
    aggregates: &HashMap<String, GemAggregate>,
    filter: EnabledFilter,
    query: &str,
    sort: TableSort,
) -> Vec<GemTableRow> {
    let query = query.trim().to_lowercase();

    let mut rows: Vec<GemTableRow> = gems
        .iter()
        .map(|gem| {
            let agg = aggregates.get(&gem.name).cloned().unwrap_or_default();
            GemTableRow {
                name: gem.name.clone(),
                summary: gem.summary.clone(),
                enabled: gem.enabled,
                updated_at: gem.updated_at.clone(),
                count: agg.count,
                public_count: agg.public_count,
                ok_count: agg.ok_count,
                error_count: agg.error_count,
                by_day: agg.by_day,
            }
        })
        .filter(|row| match filter {
            EnabledFilter::All => true,
            EnabledFilter::Enabled => row.enabled,
            EnabledFilter::Disabled => !row.enabled,
        })
        .filter(|row| {
            if query.is_empty() {
                return true;
            }
            format!("{} {}", row.name, row.summary)
                .to_lowercase()
                .contains(&query)
        })
        .collect();

    match sort {
        TableSort::RunsDesc => {
            rows.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
        }
        TableSort::ErrorsDesc => {
            rows.sort_by(|a, b| {
                b.error_count
                    .cmp(&a.error_count)
                    .then_with(|| b.count.cmp(&a.count))
                    .then_with(|| a.name.cmp(&b.name))
            });
        }
        TableSort::NameAsc => {
            rows.sort_by(|a, b| a.name.cmp(&b.name));
        }
    }

    rows
}

#[derive(Error, Debug)]
pub enum UsageError {
    #[error("{0}")]
    Api(#[from] ApiError),
}

/// Fetches usage windows and keeps the latest response per flow
pub struct UsageService {
    api: Arc<ApiService>,
    team_usage: RwLock<Option<TeamUsageResponse>>,
    admin_usage: RwLock<Option<AdminUsageResponse>>,
    team_slot: FetchSlot,
    admin_slot: FetchSlot,
}

impl UsageService {
    pub fn new(api: Arc<ApiService>) -> Self {
        Self {
            api,
            team_usage: RwLock::new(None),
            admin_usage: RwLock::new(None),
            team_slot: FetchSlot::new(),
            admin_slot: FetchSlot::new(),
        }
    }

    /// Fetch the team-wide usage summary, superseding any in-flight fetch
    pub async fn refresh_team_usage(
        &self,
        team_id: Option<&str>,
        days: u32,
        limit: Option<u32>,
    ) -> Result<TeamUsageResponse, UsageError> {
        let ticket = self.team_slot.begin();
        match self
            .team_slot
            .run(ticket, self.api.team_usage(team_id, days, limit))
            .await
        {
            Some(Ok(usage)) => {
                *self.team_usage.write() = Some(usage.clone());
                Ok(usage)
            }
            Some(Err(err)) => Err(err.into()),
            None => Err(ApiError::Cancelled.into()),
        }
    }

    /// Fetch the admin usage window (summary plus raw per-gem-per-day rows)
    pub async fn refresh_admin_usage(
        &self,
        team_id: Option<&str>,
        days: u32,
    ) -> Result<AdminUsageResponse, UsageError> {
        let ticket = self.admin_slot.begin();
        match self
            .admin_slot
            .run(ticket, self.api.admin_usage(team_id, days))
            .await
        {
            Some(Ok(usage)) => {
                *self.admin_usage.write() = Some(usage.clone());
                Ok(usage)
            }
            Some(Err(err)) => Err(err.into()),
            None => Err(ApiError::Cancelled.into()),
        }
    }

    pub fn cached_team_usage(&self) -> Option<TeamUsageResponse> {
        self.team_usage.read().clone()
    }

    pub fn cached_admin_usage(&self) -> Option<AdminUsageResponse> {
        self.admin_usage.read().clone()
    }

    /// Drop cached usage and stop any in-flight refresh from committing
    pub fn clear(&self) {
        self.team_slot.cancel();
        self.admin_slot.cancel();
        *self.team_usage.write() = None;
        *self.admin_usage.write() = None;
    }
}
