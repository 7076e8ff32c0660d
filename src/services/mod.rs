//! Service layer for the Gemsrack console
//!
//! This module contains the business logic services that sit between the
//! command layer and the HTTP/database layers.

pub mod api_service;
pub mod fetch;
pub mod gem_service;
pub mod session_service;
pub mod usage_service;

pub use api_service::{clamp_days, ApiError, ApiService, DEFAULT_BASE_URL, DEFAULT_LIST_LIMIT};
pub use fetch::{FetchSlot, FetchTicket};
pub use gem_service::{matches_query, validate_gem_name, GemError, GemService};
pub use session_service::{SessionError, SessionService};
pub use usage_service::{
    aggregate_by_day, aggregate_by_gem, build_table_rows, pct, window_recent, UsageError,
    UsageService, NO_RATE,
};
