//! Gemsrack Console - Core Library
//!
//! This library provides the core functionality for the Gemsrack console,
//! a terminal client for browsing a Gemsrack gem catalog and administering
//! per-team usage.

pub mod commands;
pub mod db;
pub mod error;
pub mod services;
pub mod types;

use std::sync::Arc;

use db::{DbPool, SettingsRepository, SettingsStore};
use services::{ApiService, GemService, SessionService, UsageService};

/// Application state shared across all commands
pub struct AppState {
    /// Settings database pool
    pub pool: DbPool,
    /// Persisted console settings
    pub settings: Arc<dyn SettingsStore>,
    /// HTTP client for the Gemsrack API
    pub api_service: Arc<ApiService>,
    /// Gem catalog caches and the admin toggle
    pub gem_service: Arc<GemService>,
    /// Usage windows and client-side aggregation
    pub usage_service: Arc<UsageService>,
    /// Admin session state machine
    pub session_service: Arc<SessionService>,
}

impl AppState {
    /// Wire the service graph over one API client and one settings pool
    pub fn new(pool: DbPool, api_service: ApiService) -> Self {
        let api_service = Arc::new(api_service);
        let settings = Arc::new(SettingsRepository::new(pool.clone()));
        let gem_service = Arc::new(GemService::new(api_service.clone()));
        let usage_service = Arc::new(UsageService::new(api_service.clone()));
        let session_service = Arc::new(SessionService::new(
            api_service.clone(),
            gem_service.clone(),
            usage_service.clone(),
        ));

        Self {
            pool,
            settings,
            api_service,
            gem_service,
            usage_service,
            session_service,
        }
    }
}

// Re-export commonly used types
pub use error::{AppError, AppResult};
pub use types::*;
