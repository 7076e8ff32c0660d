//! Gem catalog type definitions

use serde::{Deserialize, Serialize};

fn default_enabled() -> bool {
    true
}

/// A gem as listed by `GET /api/gems` (no prompt bodies)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GemSummary {
    #[serde(default)]
    pub team_id: String,
    pub name: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub input_format: String,
    #[serde(default)]
    pub output_format: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

/// Full gem record from `GET /api/gems/{name}`, including prompt bodies
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GemDetail {
    #[serde(flatten)]
    pub summary: GemSummary,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub system_prompt: String,
}

/// Gem entry from `GET /api/admin/gems` (reduced shape plus the run toggle)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminGem {
    pub name: String,
    #[serde(default)]
    pub summary: String,
    pub enabled: bool,
    #[serde(default)]
    pub input_format: String,
    #[serde(default)]
    pub output_format: String,
    #[serde(default)]
    pub updated_at: String,
}

/// Response for the public gem list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GemListResponse {
    pub team_id: String,
    pub count: usize,
    pub gems: Vec<GemSummary>,
}

/// Response for a single gem lookup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GemDetailResponse {
    pub team_id: String,
    pub gem: GemDetail,
}

/// Response for the admin gem list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminGemListResponse {
    pub team_id: String,
    pub count: usize,
    pub gems: Vec<AdminGem>,
}

/// The `{ name, enabled }` pair confirmed by a toggle request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatedGem {
    pub name: String,
    pub enabled: bool,
}

/// Response for `PATCH /api/admin/gems/{name}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateGemResponse {
    pub team_id: String,
    pub gem: UpdatedGem,
}
