// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-memory health store.
//!
//! Behaves like the platform store as far as this crate can observe:
//! - callbacks arrive from background tasks, never inline
//! - route locations are delivered in fixed-size batches
//! - samples keep insertion order, so the newest is last
//! - only samples written by this app's source can be deleted
//! - effort score and plan calls fail with an unrecognized selector on
//!   platforms that predate them
//!
//! All methods that deliver results spawn onto the current Tokio runtime.

use super::{
    CompletionHandler, Delivery, HealthStore, QueryHandler, SamplePredicate, SampleQuery,
    SampleType, StoreError, StoredSample,
};
use crate::models::{
    PlatformVersion, QuantitySample, QuantityType, RouteLocation, RouteSample, Workout,
    WorkoutPlan,
};
use dashmap::DashMap;
use geo::{Distance, Geodesic};
use serde::Deserialize;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Source id stamped on samples written through this store.
pub const DEFAULT_SOURCE_ID: &str = "dev.rolandd.workout-kit";

const DEFAULT_LOCATION_BATCH_SIZE: usize = 500;

const EFFORT_SCORE_API_VERSION: PlatformVersion = PlatformVersion::new(18, 0);
const WORKOUT_PLAN_API_VERSION: PlatformVersion = PlatformVersion::new(17, 0);

#[derive(Debug, Clone)]
struct StoreSettings {
    platform_version: PlatformVersion,
    source_id: String,
    location_batch_size: usize,
}

#[derive(Default)]
struct StoreData {
    workouts: DashMap<String, Workout>,
    /// Route records keyed by workout id
    routes: DashMap<String, Vec<RouteSample>>,
    /// Locations keyed by route id
    locations: DashMap<String, Vec<RouteLocation>>,
    /// Quantity samples keyed by related workout id, in insertion order
    quantity_samples: DashMap<String, Vec<QuantitySample>>,
    /// Plans keyed by workout id
    plans: DashMap<String, WorkoutPlan>,
    calls: AtomicUsize,
}

/// DashMap-backed [`HealthStore`].
#[derive(Clone)]
pub struct InMemoryHealthStore {
    settings: StoreSettings,
    data: Arc<StoreData>,
}

impl InMemoryHealthStore {
    pub fn new(platform_version: PlatformVersion) -> Self {
        Self {
            settings: StoreSettings {
                platform_version,
                source_id: DEFAULT_SOURCE_ID.to_string(),
                location_batch_size: DEFAULT_LOCATION_BATCH_SIZE,
            },
            data: Arc::new(StoreData::default()),
        }
    }

    /// Number of locations per incremental delivery (minimum 1).
    pub fn with_location_batch_size(mut self, size: usize) -> Self {
        self.settings.location_batch_size = size.max(1);
        self
    }

    pub fn with_source_id(mut self, source_id: impl Into<String>) -> Self {
        self.settings.source_id = source_id.into();
        self
    }

    /// Total store round trips served so far.
    pub fn call_count(&self) -> usize {
        self.data.calls.load(Ordering::SeqCst)
    }

    // ─── Seeding ─────────────────────────────────────────────────

    pub fn insert_workout(&self, workout: Workout) {
        self.data.workouts.insert(workout.id.clone(), workout);
    }

    /// Attach a route with pre-recorded locations to a workout.
    pub fn insert_route(&self, route: RouteSample, locations: Vec<RouteLocation>) {
        self.data.locations.insert(route.id.clone(), locations);
        self.data
            .routes
            .entry(route.workout_id.clone())
            .or_default()
            .push(route);
    }

    /// Store a sample as-is, keeping its `source_id`.
    pub fn insert_quantity_sample(&self, workout_id: &str, sample: QuantitySample) {
        self.data
            .quantity_samples
            .entry(workout_id.to_string())
            .or_default()
            .push(sample);
    }

    pub fn insert_plan(&self, plan: WorkoutPlan) {
        self.data.plans.insert(plan.workout_id.clone(), plan);
    }

    /// Effort score samples related to a workout, oldest first.
    pub fn effort_samples(&self, workout_id: &str) -> Vec<QuantitySample> {
        self.data
            .quantity_samples
            .get(workout_id)
            .map(|samples| {
                samples
                    .iter()
                    .filter(|s| s.quantity_type == QuantityType::WorkoutEffortScore)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Load workouts, routes and plans from a JSON fixture file.
    pub fn load_fixture_file<P: AsRef<Path>>(&self, path: P) -> Result<usize, FixtureError> {
        let json_data = std::fs::read_to_string(path.as_ref())
            .map_err(|e| FixtureError::Io(e.to_string()))?;
        self.load_fixture_json(&json_data)
    }

    /// Load a JSON fixture. Returns the number of workouts loaded.
    pub fn load_fixture_json(&self, json_data: &str) -> Result<usize, FixtureError> {
        let fixture: Fixture =
            serde_json::from_str(json_data).map_err(|e| FixtureError::Parse(e.to_string()))?;

        let count = fixture.workouts.len();
        for workout in fixture.workouts {
            self.insert_workout(workout);
        }

        for route in fixture.routes {
            let start_date = route
                .locations
                .first()
                .map(|l| l.timestamp)
                .unwrap_or_default();
            let end_date = route
                .locations
                .last()
                .map(|l| l.timestamp)
                .unwrap_or(start_date);
            let sample = RouteSample {
                id: route.id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
                workout_id: route.workout_id,
                sync_identifier: route.sync_identifier,
                sync_version: route.sync_version,
                start_date,
                end_date,
            };
            self.insert_route(sample, route.locations);
        }

        for plan in fixture.plans {
            self.insert_plan(plan);
        }

        tracing::info!(workouts = count, "Loaded workout fixture");
        Ok(count)
    }

    // ─── Internals ───────────────────────────────────────────────

    fn record_call(&self) {
        self.data.calls.fetch_add(1, Ordering::SeqCst);
    }

    fn supports(&self, minimum: PlatformVersion) -> bool {
        self.settings.platform_version >= minimum
    }

    fn select_samples(&self, query: &SampleQuery) -> Result<Vec<StoredSample>, StoreError> {
        let samples: Vec<StoredSample> = match (&query.sample_type, &query.predicate) {
            (SampleType::Workout, SamplePredicate::ById(id)) => self
                .data
                .workouts
                .get(id)
                .map(|w| vec![StoredSample::Workout(Box::new(w.clone()))])
                .unwrap_or_default(),
            (SampleType::Workout, _) => Vec::new(),

            (SampleType::WorkoutRoute, SamplePredicate::ForWorkout(workout_id))
            | (
                SampleType::WorkoutRoute,
                SamplePredicate::RelatedToWorkout { workout_id, .. },
            ) => self
                .data
                .routes
                .get(workout_id)
                .map(|routes| routes.iter().cloned().map(StoredSample::Route).collect())
                .unwrap_or_default(),
            (SampleType::WorkoutRoute, SamplePredicate::ById(id)) => self
                .data
                .routes
                .iter()
                .flat_map(|entry| entry.value().clone())
                .filter(|r| &r.id == id)
                .map(StoredSample::Route)
                .collect(),

            (SampleType::EffortScore, predicate) => {
                if !self.supports(EFFORT_SCORE_API_VERSION) {
                    return Err(StoreError::UnrecognizedSelector(
                        "predicateForWorkoutEffortSamplesRelatedToWorkout".to_string(),
                    ));
                }
                self.effort_samples_matching(predicate)
            }
        };

        let skip = query.anchor.map(|a| a.0 as usize).unwrap_or(0);
        let limit = query.limit.unwrap_or(usize::MAX);
        Ok(samples.into_iter().skip(skip).take(limit).collect())
    }

    fn effort_samples_matching(&self, predicate: &SamplePredicate) -> Vec<StoredSample> {
        let (workout_id, activity_type) = match predicate {
            SamplePredicate::RelatedToWorkout {
                workout_id,
                activity_type,
            } => (workout_id, *activity_type),
            SamplePredicate::ForWorkout(workout_id) => (workout_id, None),
            SamplePredicate::ById(_) => return Vec::new(),
        };

        if let Some(activity_type) = activity_type {
            let matches = self
                .data
                .workouts
                .get(workout_id)
                .is_some_and(|w| w.activity_type == activity_type);
            if !matches {
                return Vec::new();
            }
        }

        self.effort_samples(workout_id)
            .into_iter()
            .map(StoredSample::Quantity)
            .collect()
    }

    fn remove_quantity_sample(&self, sample_id: &str) -> Result<(), StoreError> {
        for mut entry in self.data.quantity_samples.iter_mut() {
            let samples = entry.value_mut();
            if let Some(pos) = samples.iter().position(|s| s.id == sample_id) {
                if samples[pos].source_id != self.settings.source_id {
                    return Err(StoreError::NotAuthorized(format!(
                        "sample {} belongs to {}",
                        sample_id, samples[pos].source_id
                    )));
                }
                samples.remove(pos);
                return Ok(());
            }
        }
        Err(StoreError::NotFound(format!("sample {}", sample_id)))
    }

    fn store_related(
        &self,
        samples: Vec<QuantitySample>,
        workout: &Workout,
    ) -> Result<(), StoreError> {
        if !self.supports(EFFORT_SCORE_API_VERSION) {
            return Err(StoreError::UnrecognizedSelector(
                "relateWorkoutEffortSample".to_string(),
            ));
        }
        if !self.data.workouts.contains_key(&workout.id) {
            return Err(StoreError::NotFound(format!("workout {}", workout.id)));
        }

        let mut related = self
            .data
            .quantity_samples
            .entry(workout.id.clone())
            .or_default();
        for mut sample in samples {
            sample.source_id = self.settings.source_id.clone();
            related.push(sample);
        }
        Ok(())
    }

    fn store_route(
        &self,
        workout: &Workout,
        locations: Vec<RouteLocation>,
    ) -> Result<RouteSample, StoreError> {
        if !self.data.workouts.contains_key(&workout.id) {
            return Err(StoreError::NotFound(format!("workout {}", workout.id)));
        }

        let start_date = locations
            .first()
            .map(|l| l.timestamp)
            .unwrap_or(workout.start_date);
        let end_date = locations
            .last()
            .map(|l| l.timestamp)
            .unwrap_or(workout.end_date);

        let route = RouteSample {
            id: uuid::Uuid::new_v4().to_string(),
            workout_id: workout.id.clone(),
            sync_identifier: Some(uuid::Uuid::new_v4().to_string()),
            sync_version: Some(1),
            start_date,
            end_date,
        };
        self.insert_route(route.clone(), locations);
        Ok(route)
    }
}

fn deliver<T: Send + 'static>(mut handler: QueryHandler<T>, delivery: Delivery<T>) {
    tokio::spawn(async move {
        handler(delivery);
    });
}

fn complete<T: Send + 'static>(completion: CompletionHandler<T>, result: Result<T, StoreError>) {
    tokio::spawn(async move {
        completion(result);
    });
}

impl HealthStore for InMemoryHealthStore {
    fn platform_version(&self) -> PlatformVersion {
        self.settings.platform_version
    }

    fn query_samples(&self, query: SampleQuery, handler: QueryHandler<StoredSample>) {
        self.record_call();
        tracing::trace!(sample_type = ?query.sample_type, predicate = ?query.predicate, "Sample query");

        let delivery = match self.select_samples(&query) {
            Ok(samples) => Delivery::results(samples),
            Err(e) => Delivery::failed(e),
        };
        deliver(handler, delivery);
    }

    fn query_route_locations(
        &self,
        route: &RouteSample,
        mut handler: QueryHandler<RouteLocation>,
    ) {
        self.record_call();

        let Some(locations) = self.data.locations.get(&route.id).map(|l| l.clone()) else {
            deliver(
                handler,
                Delivery::failed(StoreError::NotFound(format!("route {}", route.id))),
            );
            return;
        };

        let batch_size = self.settings.location_batch_size;
        tokio::spawn(async move {
            if locations.is_empty() {
                handler(Delivery::batch(Vec::new(), true));
                return;
            }

            let batch_count = locations.len().div_ceil(batch_size);
            for (i, chunk) in locations.chunks(batch_size).enumerate() {
                handler(Delivery::batch(chunk.to_vec(), i + 1 == batch_count));
                tokio::task::yield_now().await;
            }
        });
    }

    fn delete_sample(&self, sample_id: &str, completion: CompletionHandler<()>) {
        self.record_call();
        complete(completion, self.remove_quantity_sample(sample_id));
    }

    fn relate_samples(
        &self,
        samples: Vec<QuantitySample>,
        workout: &Workout,
        completion: CompletionHandler<()>,
    ) {
        self.record_call();
        complete(completion, self.store_related(samples, workout));
    }

    fn save_route(
        &self,
        workout: &Workout,
        locations: Vec<RouteLocation>,
        completion: CompletionHandler<RouteSample>,
    ) {
        self.record_call();
        complete(completion, self.store_route(workout, locations));
    }

    fn query_workout_plan(
        &self,
        workout: &Workout,
        completion: CompletionHandler<Option<WorkoutPlan>>,
    ) {
        self.record_call();
        let result = if self.supports(WORKOUT_PLAN_API_VERSION) {
            Ok(self.data.plans.get(&workout.id).map(|p| p.clone()))
        } else {
            Err(StoreError::UnrecognizedSelector("workoutPlan".to_string()))
        };
        complete(completion, result);
    }

    fn distance_between(&self, from: &RouteLocation, to: &RouteLocation) -> f64 {
        Geodesic.distance(from.point(), to.point())
    }
}

/// Fixture file layout.
#[derive(Debug, Deserialize)]
struct Fixture {
    #[serde(default)]
    workouts: Vec<Workout>,
    #[serde(default)]
    routes: Vec<FixtureRoute>,
    #[serde(default)]
    plans: Vec<WorkoutPlan>,
}

#[derive(Debug, Deserialize)]
struct FixtureRoute {
    #[serde(default)]
    id: Option<String>,
    workout_id: String,
    #[serde(default)]
    sync_identifier: Option<String>,
    #[serde(default)]
    sync_version: Option<i64>,
    #[serde(default)]
    locations: Vec<RouteLocation>,
}

/// Errors from fixture loading.
#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
    #[error("Failed to read fixture: {0}")]
    Io(String),

    #[error("Failed to parse fixture: {0}")]
    Parse(String),
}
