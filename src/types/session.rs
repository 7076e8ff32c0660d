//! Admin session type definitions

use serde::{Deserialize, Serialize};

/// Admin session lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    #[default]
    Unauthenticated,
    Authenticating,
    Authenticated,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::Unauthenticated => "unauthenticated",
            SessionState::Authenticating => "authenticating",
            SessionState::Authenticated => "authenticated",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "authenticating" => SessionState::Authenticating,
            "authenticated" => SessionState::Authenticated,
            _ => SessionState::Unauthenticated,
        }
    }
}

/// Response for `GET /api/admin/me`
///
/// `admin` reports whether the session cookie is valid; `enabled` reports
/// whether the admin surface is configured server-side at all.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AdminProbe {
    #[serde(default)]
    pub admin: bool,
    #[serde(default)]
    pub enabled: bool,
}

/// `{ ok }` acknowledgement from login/logout
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OkResponse {
    #[serde(default)]
    pub ok: bool,
}

/// Session snapshot combining local state with the last server probe
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SessionStatus {
    pub state: SessionState,
    pub admin_available: bool,
}
