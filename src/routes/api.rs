// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Workout API routes.

use crate::error::{AppError, Result};
use crate::models::{EffortScore, LocationSample, Route, RouteLocation, Workout, WorkoutPlan};
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/capabilities", get(get_capabilities))
        .route("/api/workouts/{id}", get(get_workout))
        .route(
            "/api/workouts/{id}/routes",
            get(get_workout_routes).post(save_workout_route),
        )
        .route("/api/workouts/{id}/routes/geojson", get(get_workout_routes_geojson))
        .route("/api/workouts/{id}/plan", get(get_workout_plan))
        .route(
            "/api/workouts/{id}/effort-score",
            get(get_effort_score).put(set_effort_score),
        )
}

/// Format a UTC timestamp as RFC3339 with millisecond precision and `Z`.
fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Generic success response for mutations.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SuccessResponse {
    pub success: bool,
}

// ─── Capabilities ────────────────────────────────────────────

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct CapabilityEntry {
    pub operation: String,
    pub supported: bool,
    pub minimum_version: Option<String>,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct CapabilitiesResponse {
    pub platform_version: String,
    pub capabilities: Vec<CapabilityEntry>,
}

/// Report which operations the running platform supports.
async fn get_capabilities(State(state): State<Arc<AppState>>) -> Json<CapabilitiesResponse> {
    let capabilities = state
        .gate
        .capabilities()
        .into_iter()
        .map(|status| CapabilityEntry {
            operation: status.operation.to_string(),
            supported: status.supported,
            minimum_version: status.minimum_version.map(|v| v.to_string()),
        })
        .collect();

    Json(CapabilitiesResponse {
        platform_version: state.gate.platform_version().to_string(),
        capabilities,
    })
}

// ─── Workouts ────────────────────────────────────────────────

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct WorkoutResponse {
    pub id: String,
    pub activity_type: String,
    pub start_date: String,
    pub end_date: String,
    pub duration_seconds: f64,
    pub total_distance_meters: Option<f64>,
    pub device_name: Option<String>,
    pub source_name: Option<String>,
}

impl From<Workout> for WorkoutResponse {
    fn from(workout: Workout) -> Self {
        let total_distance_meters = workout
            .total_distance
            .as_ref()
            .filter(|q| q.unit == "m")
            .map(|q| q.value);

        Self {
            id: workout.id,
            activity_type: workout.activity_type.as_str().to_string(),
            start_date: format_utc_rfc3339(workout.start_date),
            end_date: format_utc_rfc3339(workout.end_date),
            duration_seconds: workout.duration_seconds,
            total_distance_meters,
            device_name: workout.device.and_then(|d| d.name),
            source_name: workout.source_revision.map(|s| s.source_name),
        }
    }
}

async fn get_workout(
    State(state): State<Arc<AppState>>,
    Path(workout_id): Path<String>,
) -> Result<Json<WorkoutResponse>> {
    let workout = state.workouts.get_workout(&workout_id).await?;
    Ok(Json(workout.into()))
}

// ─── Routes ──────────────────────────────────────────────────

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct LocationResponse {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
    pub horizontal_accuracy: f64,
    pub vertical_accuracy: f64,
    pub course: f64,
    pub course_accuracy: f64,
    pub speed: f64,
    pub speed_accuracy: f64,
    pub timestamp: String,
    /// Metres from the previous location; null for the first one
    pub distance: Option<f64>,
}

impl From<LocationSample> for LocationResponse {
    fn from(sample: LocationSample) -> Self {
        let l = sample.location;
        Self {
            latitude: l.latitude,
            longitude: l.longitude,
            altitude: l.altitude,
            horizontal_accuracy: l.horizontal_accuracy,
            vertical_accuracy: l.vertical_accuracy,
            course: l.course,
            course_accuracy: l.course_accuracy,
            speed: l.speed,
            speed_accuracy: l.speed_accuracy,
            timestamp: format_utc_rfc3339(l.timestamp),
            distance: sample.distance,
        }
    }
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct RouteResponse {
    pub sync_identifier: Option<String>,
    #[cfg_attr(feature = "binding-generation", ts(type = "number | null"))]
    pub sync_version: Option<i64>,
    pub total_distance_meters: f64,
    pub locations: Vec<LocationResponse>,
}

impl From<Route> for RouteResponse {
    fn from(route: Route) -> Self {
        let total_distance_meters = route.total_distance();
        Self {
            sync_identifier: route.sync_identifier,
            sync_version: route.sync_version,
            total_distance_meters,
            locations: route.locations.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct RoutesResponse {
    pub routes: Vec<RouteResponse>,
}

async fn get_workout_routes(
    State(state): State<Arc<AppState>>,
    Path(workout_id): Path<String>,
) -> Result<Json<RoutesResponse>> {
    let workout = state.workouts.get_workout(&workout_id).await?;
    let routes = state.routes.get_workout_routes(&workout).await?;

    Ok(Json(RoutesResponse {
        routes: routes.into_iter().map(Into::into).collect(),
    }))
}

/// Routes as a GeoJSON FeatureCollection of LineStrings.
async fn get_workout_routes_geojson(
    State(state): State<Arc<AppState>>,
    Path(workout_id): Path<String>,
) -> Result<Json<geojson::FeatureCollection>> {
    let workout = state.workouts.get_workout(&workout_id).await?;
    let routes = state.routes.get_workout_routes(&workout).await?;

    Ok(Json(geojson::FeatureCollection {
        bbox: None,
        features: routes.iter().map(Route::to_geojson_feature).collect(),
        foreign_members: None,
    }))
}

#[derive(Deserialize, Serialize, Validate)]
struct LocationInput {
    #[validate(range(min = -90.0, max = 90.0))]
    latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    longitude: f64,
    #[serde(default)]
    altitude: Option<f64>,
    #[serde(default)]
    horizontal_accuracy: Option<f64>,
    #[serde(default)]
    vertical_accuracy: Option<f64>,
    #[serde(default)]
    course: Option<f64>,
    #[serde(default)]
    speed: Option<f64>,
    timestamp: DateTime<Utc>,
}

impl From<LocationInput> for RouteLocation {
    fn from(input: LocationInput) -> Self {
        let mut location = RouteLocation::new(input.latitude, input.longitude, input.timestamp);
        location.altitude = input.altitude.unwrap_or(0.0);
        location.horizontal_accuracy = input.horizontal_accuracy.unwrap_or(0.0);
        location.vertical_accuracy = input.vertical_accuracy.unwrap_or(0.0);
        location.course = input.course.unwrap_or(-1.0);
        location.speed = input.speed.unwrap_or(-1.0);
        location
    }
}

#[derive(Deserialize, Validate)]
struct SaveRouteRequest {
    #[validate(length(min = 1, max = 100000), nested)]
    locations: Vec<LocationInput>,
}

async fn save_workout_route(
    State(state): State<Arc<AppState>>,
    Path(workout_id): Path<String>,
    Json(payload): Json<SaveRouteRequest>,
) -> Result<Json<SuccessResponse>> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let workout = state.workouts.get_workout(&workout_id).await?;
    let locations = payload.locations.into_iter().map(Into::into).collect();
    let success = state.routes.save_workout_route(&workout, locations).await?;

    Ok(Json(SuccessResponse { success }))
}

// ─── Plan ────────────────────────────────────────────────────

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct PlanSummary {
    pub id: String,
    pub activity_type: String,
    pub display_name: Option<String>,
}

impl From<WorkoutPlan> for PlanSummary {
    fn from(plan: WorkoutPlan) -> Self {
        Self {
            id: plan.id,
            activity_type: plan.activity_type.as_str().to_string(),
            display_name: plan.display_name,
        }
    }
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct PlanResponse {
    pub plan: Option<PlanSummary>,
}

async fn get_workout_plan(
    State(state): State<Arc<AppState>>,
    Path(workout_id): Path<String>,
) -> Result<Json<PlanResponse>> {
    let workout = state.workouts.get_workout(&workout_id).await?;
    let plan = state.plans.get_workout_plan(&workout).await?;

    Ok(Json(PlanResponse {
        plan: plan.map(Into::into),
    }))
}

// ─── Effort Score ────────────────────────────────────────────

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct EffortScoreResponse {
    /// 1-10, or null when none is recorded or the platform lacks support
    pub score: Option<u8>,
    pub available: bool,
}

async fn get_effort_score(
    State(state): State<Arc<AppState>>,
    Path(workout_id): Path<String>,
) -> Result<Json<EffortScoreResponse>> {
    let workout = state.workouts.get_workout(&workout_id).await?;
    let reading = state.effort_scores.get_effort_score(&workout).await?;

    Ok(Json(EffortScoreResponse {
        score: reading.score().map(|s| s.value()),
        available: reading.is_available(),
    }))
}

#[derive(Deserialize)]
struct SetEffortScoreRequest {
    /// Untyped so that strings and nulls get the same error as out-of-range numbers
    #[serde(default)]
    score: serde_json::Value,
}

async fn set_effort_score(
    State(state): State<Arc<AppState>>,
    Path(workout_id): Path<String>,
    Json(payload): Json<SetEffortScoreRequest>,
) -> Result<Json<SuccessResponse>> {
    tracing::debug!(workout_id = %workout_id, score = %payload.score, "Setting effort score");

    // Reject bad scores before the store sees any request
    let score = EffortScore::try_from(&payload.score)?;

    let workout = state.workouts.get_workout(&workout_id).await?;
    state
        .effort_scores
        .set_effort_score(&workout, f64::from(score.value()))
        .await?;

    Ok(Json(SuccessResponse { success: true }))
}
