//! Common test utilities and helpers
//!
//! This module provides shared test infrastructure for integration tests:
//! a stub Gemsrack server plus a fully wired [`AppState`] pointed at it.

pub mod fixtures;
pub mod mocks;

use tempfile::TempDir;

use gemsrack_console_lib::db::init_database;
use gemsrack_console_lib::services::ApiService;
use gemsrack_console_lib::AppState;

use mocks::{StubGemsrack, STUB_PASSWORD};

/// Test context that holds all resources needed for testing
pub struct TestContext {
    /// Stub server the console talks to
    pub server: StubGemsrack,
    /// Wired application state, pointed at the stub
    pub state: AppState,
    /// Temporary directory holding the settings database
    pub temp_dir: TempDir,
}

impl TestContext {
    /// Start a stub server and wire a fresh console state against it
    pub async fn new() -> Self {
        let server = StubGemsrack::start().await;
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");

        let pool = init_database(temp_dir.path().to_path_buf())
            .expect("Failed to initialize settings database");
        let api = ApiService::new(&server.base_url).expect("Failed to build API client");

        Self {
            server,
            state: AppState::new(pool, api),
            temp_dir,
        }
    }

    /// Establish an admin session with the stub's password
    pub async fn login(&self) {
        self.state
            .session_service
            .login(STUB_PASSWORD)
            .await
            .expect("Should establish admin session");
    }
}
