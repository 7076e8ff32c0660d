//! Stub Gemsrack server for integration tests
//!
//! A small axum app scripted through shared state: tests seed gems and
//! usage rows, flip failure switches, and read back what the console
//! actually sent. Admin routes are gated on the same session cookie the
//! real server sets.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use parking_lot::Mutex;
use serde_json::{json, Value};

use gemsrack_console_lib::types::GemUsageRow;

/// Password the stub accepts on `/api/admin/login`
pub const STUB_PASSWORD: &str = "correct-horse";

/// Team the stub reports when the request names none
pub const STUB_TEAM: &str = "local";

const SESSION_COOKIE: &str = "gemsrack_admin=ok";

/// One gem as the stub stores it, covering both the public and admin shapes
#[derive(Debug, Clone)]
pub struct StubGem {
    pub name: String,
    pub summary: String,
    pub enabled: bool,
    pub input_format: String,
    pub output_format: String,
    pub body: String,
    pub system_prompt: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Scripted server state shared between the test and the axum handlers
pub struct StubState {
    password: String,
    admin_enabled: AtomicBool,
    patch_fails: AtomicBool,
    usage_fails: AtomicBool,
    gems: Mutex<Vec<StubGem>>,
    usage_rows: Mutex<Vec<GemUsageRow>>,
    list_delay: Mutex<Option<Duration>>,
    usage_delay: Mutex<Option<Duration>>,
    list_calls: AtomicUsize,
    detail_calls: AtomicUsize,
    login_calls: AtomicUsize,
    patch_calls: AtomicUsize,
    last_list_query: Mutex<HashMap<String, String>>,
    last_usage_query: Mutex<HashMap<String, String>>,
}

impl StubState {
    fn new() -> Self {
        Self {
            password: STUB_PASSWORD.to_string(),
            admin_enabled: AtomicBool::new(true),
            patch_fails: AtomicBool::new(false),
            usage_fails: AtomicBool::new(false),
            gems: Mutex::new(Vec::new()),
            usage_rows: Mutex::new(Vec::new()),
            list_delay: Mutex::new(None),
            usage_delay: Mutex::new(None),
            list_calls: AtomicUsize::new(0),
            detail_calls: AtomicUsize::new(0),
            login_calls: AtomicUsize::new(0),
            patch_calls: AtomicUsize::new(0),
            last_list_query: Mutex::new(HashMap::new()),
            last_usage_query: Mutex::new(HashMap::new()),
        }
    }
}

/// Handle to a running stub server
pub struct StubGemsrack {
    /// Base URL the console should be pointed at
    pub base_url: String,
    state: Arc<StubState>,
}

impl StubGemsrack {
    /// Bind an ephemeral port and serve the stub in the background
    pub async fn start() -> Self {
        let state = Arc::new(StubState::new());
        let app = router(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind stub server");
        let addr = listener.local_addr().expect("Failed to read stub address");
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            base_url: format!("http://{}", addr),
            state,
        }
    }

    /// Replace the gem catalog
    pub fn seed_gems(&self, gems: Vec<StubGem>) {
        *self.state.gems.lock() = gems;
    }

    /// Replace the per-gem-per-day usage rows
    pub fn seed_usage(&self, rows: Vec<GemUsageRow>) {
        *self.state.usage_rows.lock() = rows;
    }

    /// Current server-side copy of one gem
    pub fn gem(&self, name: &str) -> Option<StubGem> {
        self.state.gems.lock().iter().find(|g| g.name == name).cloned()
    }

    /// Configure whether the admin surface exists at all (503 when false)
    pub fn set_admin_enabled(&self, enabled: bool) {
        self.state.admin_enabled.store(enabled, Ordering::SeqCst);
    }

    /// Make every PATCH fail with a 500
    pub fn fail_patches(&self, fail: bool) {
        self.state.patch_fails.store(fail, Ordering::SeqCst);
    }

    /// Make every usage endpoint fail with a 500
    pub fn fail_usage(&self, fail: bool) {
        self.state.usage_fails.store(fail, Ordering::SeqCst);
    }

    /// Hold gem list responses for `delay` (None clears the hold)
    pub fn delay_lists(&self, delay: Option<Duration>) {
        *self.state.list_delay.lock() = delay;
    }

    /// Hold usage responses for `delay` (None clears the hold)
    pub fn delay_usage(&self, delay: Option<Duration>) {
        *self.state.usage_delay.lock() = delay;
    }

    pub fn list_calls(&self) -> usize {
        self.state.list_calls.load(Ordering::SeqCst)
    }

    pub fn detail_calls(&self) -> usize {
        self.state.detail_calls.load(Ordering::SeqCst)
    }

    pub fn login_calls(&self) -> usize {
        self.state.login_calls.load(Ordering::SeqCst)
    }

    pub fn patch_calls(&self) -> usize {
        self.state.patch_calls.load(Ordering::SeqCst)
    }

    /// Query parameters of the most recent public gem list request
    pub fn last_list_query(&self) -> HashMap<String, String> {
        self.state.last_list_query.lock().clone()
    }

    /// Query parameters of the most recent usage request
    pub fn last_usage_query(&self) -> HashMap<String, String> {
        self.state.last_usage_query.lock().clone()
    }
}

fn router(state: Arc<StubState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/gems", get(list_gems))
        .route("/api/gems/:name", get(get_gem))
        .route("/api/metrics/gem-usage", get(team_usage))
        .route("/api/admin/me", get(admin_me))
        .route("/api/admin/login", post(admin_login))
        .route("/api/admin/logout", post(admin_logout))
        .route("/api/admin/gems", get(admin_list_gems))
        .route("/api/admin/gems/:name", patch(admin_patch_gem))
        .route("/api/admin/usage", get(admin_usage))
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

async fn list_gems(
    State(state): State<Arc<StubState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    state.list_calls.fetch_add(1, Ordering::SeqCst);
    *state.last_list_query.lock() = params.clone();

    let delay = *state.list_delay.lock();
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }

    // Disabled gems never appear in the public catalog.
    let gems: Vec<Value> = state
        .gems
        .lock()
        .iter()
        .filter(|g| g.enabled)
        .map(public_json)
        .collect();

    let body = json!({
        "team_id": team_of(&params),
        "count": gems.len(),
        "gems": gems,
    });
    (StatusCode::OK, Json(body)).into_response()
}

async fn get_gem(
    State(state): State<Arc<StubState>>,
    Path(name): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    state.detail_calls.fetch_add(1, Ordering::SeqCst);

    let gem = state
        .gems
        .lock()
        .iter()
        .find(|g| g.name == name && g.enabled)
        .cloned();
    match gem {
        Some(gem) => {
            let body = json!({
                "team_id": team_of(&params),
                "gem": detail_json(&gem),
            });
            (StatusCode::OK, Json(body)).into_response()
        }
        None => not_found(),
    }
}

async fn team_usage(
    State(state): State<Arc<StubState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    *state.last_usage_query.lock() = params.clone();

    let delay = *state.usage_delay.lock();
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }
    if state.usage_fails.load(Ordering::SeqCst) {
        return server_error();
    }

    let rows = state.usage_rows.lock().clone();
    let mut body = summarize(&rows);
    body["team_id"] = json!(team_of(&params));
    body["days"] = json!(days_of(&params));
    (StatusCode::OK, Json(body)).into_response()
}

async fn admin_me(State(state): State<Arc<StubState>>, headers: HeaderMap) -> Response {
    if !state.admin_enabled.load(Ordering::SeqCst) {
        return admin_disabled();
    }
    let body = json!({ "admin": has_session(&headers), "enabled": true });
    (StatusCode::OK, Json(body)).into_response()
}

async fn admin_login(State(state): State<Arc<StubState>>, Json(body): Json<Value>) -> Response {
    state.login_calls.fetch_add(1, Ordering::SeqCst);

    if !state.admin_enabled.load(Ordering::SeqCst) {
        return admin_disabled();
    }
    if body["password"].as_str() != Some(state.password.as_str()) {
        return unauthorized();
    }

    (
        StatusCode::OK,
        [(header::SET_COOKIE, "gemsrack_admin=ok; Path=/; HttpOnly")],
        Json(json!({ "ok": true })),
    )
        .into_response()
}

async fn admin_logout() -> Response {
    // Always succeeds; clearing an absent session is a no-op.
    (
        StatusCode::OK,
        [(header::SET_COOKIE, "gemsrack_admin=; Path=/; Max-Age=0")],
        Json(json!({ "ok": true })),
    )
        .into_response()
}

async fn admin_list_gems(
    State(state): State<Arc<StubState>>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    if !state.admin_enabled.load(Ordering::SeqCst) {
        return admin_disabled();
    }
    if !has_session(&headers) {
        return unauthorized();
    }

    // The admin view includes disabled gems.
    let gems: Vec<Value> = state.gems.lock().iter().map(admin_json).collect();
    let body = json!({
        "team_id": team_of(&params),
        "count": gems.len(),
        "gems": gems,
    });
    (StatusCode::OK, Json(body)).into_response()
}

async fn admin_patch_gem(
    State(state): State<Arc<StubState>>,
    Path(name): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    state.patch_calls.fetch_add(1, Ordering::SeqCst);

    if !state.admin_enabled.load(Ordering::SeqCst) {
        return admin_disabled();
    }
    if !has_session(&headers) {
        return unauthorized();
    }
    if state.patch_fails.load(Ordering::SeqCst) {
        return server_error();
    }

    let enabled = match body["enabled"].as_bool() {
        Some(enabled) => enabled,
        None => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "enabled must be a boolean" })),
            )
                .into_response()
        }
    };

    let mut gems = state.gems.lock();
    match gems.iter_mut().find(|g| g.name == name) {
        Some(gem) => {
            gem.enabled = enabled;
            let body = json!({
                "team_id": team_of(&params),
                "gem": { "name": gem.name, "enabled": gem.enabled },
            });
            (StatusCode::OK, Json(body)).into_response()
        }
        None => not_found(),
    }
}

async fn admin_usage(
    State(state): State<Arc<StubState>>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    *state.last_usage_query.lock() = params.clone();

    if !state.admin_enabled.load(Ordering::SeqCst) {
        return admin_disabled();
    }
    if !has_session(&headers) {
        return unauthorized();
    }
    if state.usage_fails.load(Ordering::SeqCst) {
        return server_error();
    }

    let mut rows = state.usage_rows.lock().clone();
    rows.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.gem_name.cmp(&b.gem_name)));

    let body = json!({
        "team_id": team_of(&params),
        "days": days_of(&params),
        "summary": summarize(&rows),
        "by_gem_day": rows,
    });
    (StatusCode::OK, Json(body)).into_response()
}

fn has_session(headers: &HeaderMap) -> bool {
    headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.contains(SESSION_COOKIE))
        .unwrap_or(false)
}

fn team_of(params: &HashMap<String, String>) -> String {
    params
        .get("team_id")
        .cloned()
        .unwrap_or_else(|| STUB_TEAM.to_string())
}

fn days_of(params: &HashMap<String, String>) -> u32 {
    params
        .get("days")
        .and_then(|d| d.parse().ok())
        .unwrap_or(30)
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "error": "unauthorized" })),
    )
        .into_response()
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "not_found" }))).into_response()
}

fn server_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "internal" })),
    )
        .into_response()
}

fn admin_disabled() -> Response {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(json!({ "admin": false, "enabled": false })),
    )
        .into_response()
}

// The public list omits the enabled flag entirely.
fn public_json(gem: &StubGem) -> Value {
    json!({
        "team_id": STUB_TEAM,
        "name": gem.name,
        "summary": gem.summary,
        "input_format": gem.input_format,
        "output_format": gem.output_format,
        "created_at": gem.created_at,
        "updated_at": gem.updated_at,
    })
}

fn detail_json(gem: &StubGem) -> Value {
    let mut detail = public_json(gem);
    detail["enabled"] = json!(gem.enabled);
    detail["body"] = json!(gem.body);
    detail["system_prompt"] = json!(gem.system_prompt);
    detail
}

fn admin_json(gem: &StubGem) -> Value {
    json!({
        "name": gem.name,
        "summary": gem.summary,
        "enabled": gem.enabled,
        "input_format": gem.input_format,
        "output_format": gem.output_format,
        "updated_at": gem.updated_at,
    })
}

// Independent of the library's aggregation so tests comparing the two
// actually compare two implementations.
fn summarize(rows: &[GemUsageRow]) -> Value {
    let mut dates: Vec<String> = rows.iter().map(|r| r.date.clone()).collect();
    dates.sort();
    dates.dedup();

    let by_day: Vec<Value> = dates
        .iter()
        .map(|date| {
            let day: Vec<&GemUsageRow> = rows.iter().filter(|r| &r.date == date).collect();
            json!({
                "date": date,
                "total_count": day.iter().map(|r| r.count).sum::<u64>(),
                "public_count": day.iter().map(|r| r.public_count).sum::<u64>(),
                "ok_count": day.iter().map(|r| r.ok_count).sum::<u64>(),
                "error_count": day.iter().map(|r| r.error_count).sum::<u64>(),
            })
        })
        .collect();

    let mut names: Vec<String> = rows.iter().map(|r| r.gem_name.clone()).collect();
    names.sort();
    names.dedup();

    let mut top_gems: Vec<Value> = names
        .iter()
        .map(|name| {
            let gem: Vec<&GemUsageRow> = rows.iter().filter(|r| &r.gem_name == name).collect();
            json!({
                "gem_name": name,
                "count": gem.iter().map(|r| r.count).sum::<u64>(),
                "public_count": gem.iter().map(|r| r.public_count).sum::<u64>(),
                "ok_count": gem.iter().map(|r| r.ok_count).sum::<u64>(),
                "error_count": gem.iter().map(|r| r.error_count).sum::<u64>(),
            })
        })
        .collect();
    top_gems.sort_by(|a, b| {
        b["count"]
            .as_u64()
            .cmp(&a["count"].as_u64())
            .then_with(|| a["gem_name"].as_str().cmp(&b["gem_name"].as_str()))
    });

    json!({
        "from_date": dates.first().cloned().unwrap_or_default(),
        "to_date": dates.last().cloned().unwrap_or_default(),
        "total_count": rows.iter().map(|r| r.count).sum::<u64>(),
        "public_count": rows.iter().map(|r| r.public_count).sum::<u64>(),
        "ok_count": rows.iter().map(|r| r.ok_count).sum::<u64>(),
        "error_count": rows.iter().map(|r| r.error_count).sum::<u64>(),
        "by_day": by_day,
        "top_gems": top_gems,
    })
}
