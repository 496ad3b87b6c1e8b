//! HTTP API for the Meeting Cost Engine.
//!
//! This module exposes the cost model and the meeting aggregator as a
//! small JSON API using [`axum`](https://crates.io/crates/axum).  Rate
//! profiles are loaded once from disk at start-up; a request may name a
//! profile by region (`"BM"`) or by region and version (`"BM-2025"`)
//! and may layer its own overrides on top.

use crate::config::ServerConfig;
use crate::cost_model::{batch_recompute, compute_cost, refresh_employees};
use crate::engine::{predict, real_time, settle, summarize};
use crate::error::EngineError;
use crate::models::{
    Attendee, CostBreakdown, Employee, MeetingOutcome, MeetingsSummary, PredictionResult, RealTimeResult,
    SettlementResult,
};
use crate::rates::{load_rate_profiles_from_dir, JurisdictionRates, RateConfig, RateProfile};
use crate::sanitize::RawCompensation;
use crate::validation::{
    validate_compensation, validate_employee, validate_meeting, validate_rates, EmployeeForm, FieldErrors,
    MeetingForm,
};
use anyhow::Result;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Application state shared across requests.
pub struct AppState {
    pub rates: RwLock<HashMap<String, JurisdictionRates>>,
    pub default_region: String,
}

impl AppState {
    /// Resolve profiles into a lookup table keyed by both `region-version`
    /// and bare `region`.  The bare region points at the region's primary
    /// profile, or at its highest version when none is marked primary.
    /// Profiles that fail to resolve are skipped.
    pub fn new(mut profiles: Vec<RateProfile>, default_region: &str) -> Self {
        profiles.sort_by(|a, b| {
            (&a.region, a.primary, &a.version).cmp(&(&b.region, b.primary, &b.version))
        });
        let mut rates = HashMap::new();
        for profile in profiles {
            match profile.rates.resolve() {
                Ok(resolved) => {
                    rates.insert(profile.key(), resolved);
                    rates.insert(profile.region.clone(), resolved);
                }
                Err(err) => {
                    tracing::warn!(profile = %profile.key(), error = %err, "skipping invalid rate profile");
                }
            }
        }
        rates
            .entry(default_region.to_string())
            .or_insert_with(JurisdictionRates::default);
        tracing::info!(profiles = rates.len(), default_region, "rate profiles ready");
        Self {
            rates: RwLock::new(rates),
            default_region: default_region.to_string(),
        }
    }

    async fn resolve_rates(
        &self,
        region: Option<&str>,
        overrides: Option<&RateConfig>,
    ) -> std::result::Result<JurisdictionRates, ApiError> {
        let region = region.unwrap_or(&self.default_region);
        let base = self
            .rates
            .read()
            .await
            .get(region)
            .copied()
            .ok_or_else(|| ApiError::UnknownRegion(region.to_string()))?;
        match overrides {
            Some(config) => Ok(config.resolve_over(&base)?),
            None => Ok(base),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("unknown rate region: {0}")]
    UnknownRegion(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::Engine(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::UnknownRegion(_) => StatusCode::NOT_FOUND,
        };
        let body = Json(serde_json::json!({"error": self.to_string()}));
        (status, body).into_response()
    }
}

type ApiResult<T> = std::result::Result<Json<T>, ApiError>;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeCostRequest {
    #[serde(flatten)]
    pub compensation: RawCompensation,
    pub region: Option<String>,
    pub rates: Option<RateConfig>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchCostRequest {
    pub employees: Vec<RawCompensation>,
    pub region: Option<String>,
    pub rates: Option<RateConfig>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub employees: Vec<Employee>,
    pub region: Option<String>,
    pub rates: Option<RateConfig>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictRequest {
    pub attendees: Vec<Attendee>,
    pub duration_minutes: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveRequest {
    pub attendees: Vec<Attendee>,
    pub elapsed_minutes: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettleRequest {
    pub attendees: Vec<Attendee>,
    pub actual_minutes: f64,
    pub scheduled_minutes: f64,
}

#[derive(Debug, Deserialize)]
pub struct SummaryRequest {
    pub meetings: Vec<MeetingOutcome>,
}

/// Build the router over an existing state.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/rates", get(rates_handler))
        .route("/api/employee-cost", post(employee_cost_handler))
        .route("/api/employee-cost/batch", post(batch_cost_handler))
        .route("/api/employees/refresh", post(refresh_handler))
        .route("/api/validate/compensation", post(validate_compensation_handler))
        .route("/api/validate/employee", post(validate_employee_handler))
        .route("/api/validate/rates", post(validate_rates_handler))
        .route("/api/validate/meeting", post(validate_meeting_handler))
        .route("/api/meetings/predict", post(predict_handler))
        .route("/api/meetings/live", post(live_handler))
        .route("/api/meetings/settle", post(settle_handler))
        .route("/api/meetings/summary", post(summary_handler))
        .with_state(state)
}

/// Load rate profiles from the configured directory and build the
/// router.  Returns the router and a handle to the state.
pub async fn build_router(config: &ServerConfig) -> Result<(Router, Arc<AppState>)> {
    let profiles = load_rate_profiles_from_dir(&config.rates_dir)?;
    let state = Arc::new(AppState::new(profiles, &config.default_region));
    Ok((router(state.clone()), state))
}

/// Handler for GET /api/rates
async fn rates_handler(State(state): State<Arc<AppState>>) -> Json<BTreeMap<String, JurisdictionRates>> {
    let rates = state.rates.read().await;
    Json(rates.iter().map(|(k, v)| (k.clone(), *v)).collect())
}

/// Handler for POST /api/employee-cost
async fn employee_cost_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<EmployeeCostRequest>,
) -> ApiResult<CostBreakdown> {
    let rates = state
        .resolve_rates(request.region.as_deref(), request.rates.as_ref())
        .await?;
    Ok(Json(compute_cost(&request.compensation.sanitize(), &rates)))
}

/// Handler for POST /api/employee-cost/batch
async fn batch_cost_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<BatchCostRequest>,
) -> ApiResult<Vec<CostBreakdown>> {
    let rates = state
        .resolve_rates(request.region.as_deref(), request.rates.as_ref())
        .await?;
    let profiles: Vec<_> = request.employees.iter().map(RawCompensation::sanitize).collect();
    Ok(Json(batch_recompute(&profiles, &rates)))
}

/// Handler for POST /api/employees/refresh
async fn refresh_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RefreshRequest>,
) -> ApiResult<Vec<Employee>> {
    let rates = state
        .resolve_rates(request.region.as_deref(), request.rates.as_ref())
        .await?;
    Ok(Json(refresh_employees(request.employees, &rates)))
}

/// Handler for POST /api/validate/compensation
async fn validate_compensation_handler(Json(raw): Json<RawCompensation>) -> (StatusCode, Json<FieldErrors>) {
    field_errors_response(validate_compensation(&raw))
}

/// Handler for POST /api/validate/employee
async fn validate_employee_handler(Json(form): Json<EmployeeForm>) -> (StatusCode, Json<FieldErrors>) {
    field_errors_response(validate_employee(&form))
}

/// Handler for POST /api/validate/meeting
async fn validate_meeting_handler(Json(form): Json<MeetingForm>) -> (StatusCode, Json<FieldErrors>) {
    field_errors_response(validate_meeting(&form))
}

/// Handler for POST /api/validate/rates
async fn validate_rates_handler(Json(config): Json<RateConfig>) -> (StatusCode, Json<FieldErrors>) {
    field_errors_response(validate_rates(&config))
}

fn field_errors_response(errors: FieldErrors) -> (StatusCode, Json<FieldErrors>) {
    let status = if errors.is_valid() {
        StatusCode::OK
    } else {
        StatusCode::UNPROCESSABLE_ENTITY
    };
    (status, Json(errors))
}

/// Handler for POST /api/meetings/predict
async fn predict_handler(Json(request): Json<PredictRequest>) -> ApiResult<PredictionResult<Attendee>> {
    Ok(Json(predict(&request.attendees, request.duration_minutes)?))
}

/// Handler for POST /api/meetings/live
async fn live_handler(Json(request): Json<LiveRequest>) -> ApiResult<RealTimeResult<Attendee>> {
    Ok(Json(real_time(&request.attendees, request.elapsed_minutes)?))
}

/// Handler for POST /api/meetings/settle
async fn settle_handler(Json(request): Json<SettleRequest>) -> ApiResult<SettlementResult<Attendee>> {
    Ok(Json(settle(
        &request.attendees,
        request.actual_minutes,
        request.scheduled_minutes,
    )?))
}

/// Handler for POST /api/meetings/summary
async fn summary_handler(Json(request): Json<SummaryRequest>) -> Json<MeetingsSummary> {
    Json(summarize(&request.meetings))
}

/// Launch the API server.  Builds the router from the configured rate
/// directory and serves until the process is interrupted.
pub async fn serve(config: &ServerConfig) -> Result<()> {
    let (router, _state) = build_router(config).await?;
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "server listening");
    axum::serve(listener, router).await?;
    Ok(())
}
