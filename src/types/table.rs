//! Dashboard table view-model definitions

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Enabled-state filter for the dashboard table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EnabledFilter {
    #[default]
    All,
    Enabled,
    Disabled,
}

impl EnabledFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnabledFilter::All => "all",
            EnabledFilter::Enabled => "enabled",
            EnabledFilter::Disabled => "disabled",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "enabled" => EnabledFilter::Enabled,
            "disabled" => EnabledFilter::Disabled,
            _ => EnabledFilter::All,
        }
    }
}

/// Sort mode for the dashboard table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TableSort {
    #[default]
    RunsDesc,
    ErrorsDesc,
    NameAsc,
}

impl TableSort {
    pub fn as_str(&self) -> &'static str {
        match self {
            TableSort::RunsDesc => "runs_desc",
            TableSort::ErrorsDesc => "errors_desc",
            TableSort::NameAsc => "name_asc",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "errors" | "errors_desc" => TableSort::ErrorsDesc,
            "name" | "name_asc" => TableSort::NameAsc,
            _ => TableSort::RunsDesc,
        }
    }
}

/// One dashboard row: gem metadata joined with its usage aggregate
#[derive(Debug, Clone, Serialize)]
pub struct GemTableRow {
    pub name: String,
    pub summary: String,
    pub enabled: bool,
    pub updated_at: String,
    pub count: u64,
    pub public_count: u64,
    pub ok_count: u64,
    pub error_count: u64,
    pub by_day: BTreeMap<String, u64>,
}
