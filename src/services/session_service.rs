//! Admin session state machine
//!
//! States: unauthenticated, authenticating, authenticated. Logout works
//! from any state and clears every gem/usage cache, superseding whatever
//! fetches are still in flight.

use std::sync::Arc;

use parking_lot::RwLock;
use thiserror::Error;

use crate::services::api_service::{ApiError, ApiService};
use crate::services::gem_service::GemService;
use crate::services::usage_service::UsageService;
use crate::types::{AdminProbe, SessionState, SessionStatus};

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("{0}")]
    Api(#[from] ApiError),
}

/// Tracks the admin session and owns the caches it must clear on logout
pub struct SessionService {
    api: Arc<ApiService>,
    gem_service: Arc<GemService>,
    usage_service: Arc<UsageService>,
    state: RwLock<SessionState>,
    admin_available: RwLock<bool>,
}

impl SessionService {
    pub fn new(
        api: Arc<ApiService>,
        gem_service: Arc<GemService>,
        usage_service: Arc<UsageService>,
    ) -> Self {
        Self {
            api,
            gem_service,
            usage_service,
            state: RwLock::new(SessionState::Unauthenticated),
            admin_available: RwLock::new(true),
        }
    }

    pub fn state(&self) -> SessionState {
        *self.state.read()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state() == SessionState::Authenticated
    }

    pub fn status(&self) -> SessionStatus {
        SessionStatus {
            state: self.state(),
            admin_available: *self.admin_available.read(),
        }
    }

    /// Submit the admin password.
    ///
    /// The password is trimmed first; an empty result is rejected without a
    /// network call. On failure the state returns to unauthenticated and
    /// the error is surfaced.
    pub async fn login(&self, password: &str) -> Result<(), SessionError> {
        let password = password.trim();
        if password.is_empty() {
            return Err(SessionError::Validation(
                "password must not be empty".to_string(),
            ));
        }

        *self.state.write() = SessionState::Authenticating;

        match self.api.admin_login(password).await {
            Ok(_) => {
                *self.state.write() = SessionState::Authenticated;
                tracing::info!("admin session established");
                Ok(())
            }
            Err(err) => {
                *self.state.write() = SessionState::Unauthenticated;
                Err(err.into())
            }
        }
    }

    /// End the session, from any state.
    ///
    /// Local state and every gem/usage cache are cleared unconditionally; a
    /// failing server-side logout is logged and otherwise ignored.
    pub async fn logout(&self) {
        if let Err(err) = self.api.admin_logout().await {
            tracing::debug!(error = %err, "logout request failed, clearing local session anyway");
        }

        *self.state.write() = SessionState::Unauthenticated;
        self.gem_service.clear();
        self.usage_service.clear();
    }

    /// Probe the server for an existing session cookie.
    ///
    /// Any probe failure (including the 503 served when the admin surface
    /// is unconfigured) downgrades to unauthenticated with the admin
    /// surface marked unavailable.
    pub async fn restore(&self) -> Result<AdminProbe, SessionError> {
        match self.api.admin_probe().await {
            Ok(probe) => {
                *self.admin_available.write() = probe.enabled;
                *self.state.write() = if probe.admin {
                    SessionState::Authenticated
                } else {
                    SessionState::Unauthenticated
                };
                Ok(probe)
            }
            Err(err) => {
                *self.admin_available.write() = false;
                *self.state.write() = SessionState::Unauthenticated;
                Err(err.into())
            }
        }
    }
}
