//! Gem catalog service: caches, filtering, name validation, admin toggle

use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use regex::Regex;
use thiserror::Error;

use crate::services::api_service::{ApiError, ApiService};
use crate::services::fetch::FetchSlot;
use crate::types::{AdminGem, GemDetail, GemSummary, UpdatedGem};

// Server-side naming rule: 1-32 chars of a-z 0-9 _ -, leading alphanumeric.
static GEM_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new("^[a-z0-9][a-z0-9_-]{0,31}$").expect("gem name pattern compiles"));

#[derive(Error, Debug)]
pub enum GemError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("{0}")]
    Api(#[from] ApiError),
}

/// Normalize (trim, lowercase) and validate a gem name before it is placed
/// in a URL path. Invalid names fail here, with no request sent.
pub fn validate_gem_name(name: &str) -> Result<String, GemError> {
    let normalized = name.trim().to_lowercase();
    if !GEM_NAME_RE.is_match(&normalized) {
        return Err(GemError::Validation(format!(
            "invalid gem name {:?}: expected 1-32 chars of a-z, 0-9, _ or -, starting alphanumeric",
            name
        )));
    }
    Ok(normalized)
}

/// Case-insensitive substring match of `query` against `name + " " + summary`
pub fn matches_query(name: &str, summary: &str, query: &str) -> bool {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return true;
    }
    format!("{} {}", name, summary).to_lowercase().contains(&query)
}

/// Holds the latest server-confirmed gem data per flow
pub struct GemService {
    api: Arc<ApiService>,
    gems: RwLock<Vec<GemSummary>>,
    selected: RwLock<Option<GemDetail>>,
    admin_gems: RwLock<Vec<AdminGem>>,
    list_slot: FetchSlot,
    detail_slot: FetchSlot,
    admin_slot: FetchSlot,
}

impl GemService {
    pub fn new(api: Arc<ApiService>) -> Self {
        Self {
            api,
            gems: RwLock::new(Vec::new()),
            selected: RwLock::new(None),
            admin_gems: RwLock::new(Vec::new()),
            list_slot: FetchSlot::new(),
            detail_slot: FetchSlot::new(),
            admin_slot: FetchSlot::new(),
        }
    }

    /// Fetch the public catalog, superseding any in-flight list fetch
    pub async fn refresh_gems(
        &self,
        team_id: Option<&str>,
        limit: Option<u32>,
    ) -> Result<Vec<GemSummary>, GemError> {
        let ticket = self.list_slot.begin();
        match self
            .list_slot
            .run(ticket, self.api.list_gems(team_id, limit))
            .await
        {
            Some(Ok(response)) => {
                *self.gems.write() = response.gems.clone();
                Ok(response.gems)
            }
            Some(Err(err)) => Err(err.into()),
            None => Err(ApiError::Cancelled.into()),
        }
    }

    /// Fetch one gem including prompt bodies, superseding any in-flight
    /// detail fetch
    pub async fn gem_detail(
        &self,
        name: &str,
        team_id: Option<&str>,
    ) -> Result<GemDetail, GemError> {
        let name = validate_gem_name(name)?;
        let ticket = self.detail_slot.begin();
        match self
            .detail_slot
            .run(ticket, self.api.get_gem(&name, team_id))
            .await
        {
            Some(Ok(response)) => {
                *self.selected.write() = Some(response.gem.clone());
                Ok(response.gem)
            }
            Some(Err(err)) => Err(err.into()),
            None => Err(ApiError::Cancelled.into()),
        }
    }

    /// Fetch the admin gem list, superseding any in-flight admin fetch
    pub async fn refresh_admin_gems(
        &self,
        team_id: Option<&str>,
    ) -> Result<Vec<AdminGem>, GemError> {
        let ticket = self.admin_slot.begin();
        match self
            .admin_slot
            .run(ticket, self.api.admin_list_gems(team_id))
            .await
        {
            Some(Ok(response)) => {
                *self.admin_gems.write() = response.gems.clone();
                Ok(response.gems)
            }
            Some(Err(err)) => Err(err.into()),
            None => Err(ApiError::Cancelled.into()),
        }
    }

    /// Toggle a gem's enabled flag.
    ///
    /// The new value is applied to the cached list immediately; if the
    /// server rejects the call, the prior value is restored before the
    /// error is returned.
    pub async fn set_enabled(
        &self,
        name: &str,
        enabled: bool,
        team_id: Option<&str>,
    ) -> Result<UpdatedGem, GemError> {
        let name = validate_gem_name(name)?;

        let previous = self.apply_enabled(&name, enabled);

        match self.api.admin_set_gem_enabled(&name, enabled, team_id).await {
            Ok(response) => {
                self.apply_enabled(&response.gem.name, response.gem.enabled);
                Ok(response.gem)
            }
            Err(err) => {
                if let Some(prior) = previous {
                    tracing::warn!(gem = %name, "toggle rejected, restoring cached value");
                    self.apply_enabled(&name, prior);
                }
                Err(err.into())
            }
        }
    }

    /// Cached public catalog, filtered by the dashboard query
    pub fn filtered_gems(&self, query: &str) -> Vec<GemSummary> {
        self.gems
            .read()
            .iter()
            .filter(|gem| matches_query(&gem.name, &gem.summary, query))
            .cloned()
            .collect()
    }

    pub fn cached_gems(&self) -> Vec<GemSummary> {
        self.gems.read().clone()
    }

    pub fn cached_admin_gems(&self) -> Vec<AdminGem> {
        self.admin_gems.read().clone()
    }

    pub fn cached_detail(&self) -> Option<GemDetail> {
        self.selected.read().clone()
    }

    /// Drop all cached gem data and stop in-flight fetches from committing
    pub fn clear(&self) {
        self.list_slot.cancel();
        self.detail_slot.cancel();
        self.admin_slot.cancel();
        self.gems.write().clear();
        *self.selected.write() = None;
        self.admin_gems.write().clear();
    }

    fn apply_enabled(&self, name: &str, enabled: bool) -> Option<bool> {
        let mut gems = self.admin_gems.write();
        let gem = gems.iter_mut().find(|g| g.name == name)?;
        let prior = gem.enabled;
        gem.enabled = enabled;
        Some(prior)
    }
}
