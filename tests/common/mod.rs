// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use workout_kit::config::Config;
use workout_kit::db::{
    CompletionHandler, Delivery, HealthStore, InMemoryHealthStore, QueryHandler, SampleQuery,
    StoreError, StoredSample,
};
use workout_kit::models::{
    ActivityType, PlatformVersion, QuantitySample, RouteLocation, RouteSample, Workout,
    WorkoutPlan,
};
use workout_kit::routes::create_router;
use workout_kit::services::CapabilityGate;
use workout_kit::AppState;

#[allow(dead_code)]
pub const WORKOUT_ID: &str = "6F0E2A3B-1C4D-4E5F-8A9B-0C1D2E3F4A5B";
#[allow(dead_code)]
pub const OTHER_WORKOUT_ID: &str = "A1B2C3D4-E5F6-4711-8899-AABBCCDDEEFF";

#[allow(dead_code)]
pub fn timestamp(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(1_717_225_200 + secs, 0).expect("valid timestamp")
}

#[allow(dead_code)]
pub fn workout(id: &str) -> Workout {
    Workout::new(id, ActivityType::Running, timestamp(0), timestamp(3600))
}

/// Locations heading north from Rancho San Antonio, one per second.
#[allow(dead_code)]
pub fn track(count: usize, offset: usize) -> Vec<RouteLocation> {
    (0..count)
        .map(|i| {
            let n = (i + offset) as f64;
            RouteLocation::new(37.3320 + n * 0.0001, -122.0870, timestamp((i + offset) as i64))
        })
        .collect()
}

#[allow(dead_code)]
pub fn route_sample(id: &str, workout_id: &str, sync_identifier: Option<&str>) -> RouteSample {
    RouteSample {
        id: id.to_string(),
        workout_id: workout_id.to_string(),
        sync_identifier: sync_identifier.map(str::to_string),
        sync_version: sync_identifier.map(|_| 1),
        start_date: timestamp(0),
        end_date: timestamp(3600),
    }
}

/// In-memory store on `version` holding the two test workouts.
#[allow(dead_code)]
pub fn seeded_store(version: PlatformVersion) -> InMemoryHealthStore {
    let store = InMemoryHealthStore::new(version).with_location_batch_size(4);
    store.insert_workout(workout(WORKOUT_ID));
    store.insert_workout(workout(OTHER_WORKOUT_ID));
    store
}

/// Create a test app over `store`, gated on the store's own version.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app(store: InMemoryHealthStore) -> (axum::Router, Arc<AppState>) {
    let gate = CapabilityGate::new(store.platform_version());
    let state = Arc::new(AppState::new(Config::test_default(), Arc::new(store), gate));
    (create_router(state.clone()), state)
}

/// A canned response to a single-shot sample query.
#[allow(dead_code)]
#[derive(Clone)]
pub enum ScriptedResponse {
    Results(Vec<StoredSample>),
    Error(StoreError),
    /// Callback fires with neither results nor an error
    Empty,
}

/// Store that replays scripted deliveries inline, from the calling task.
///
/// Location deliveries are keyed by route id; every `Delivery` listed is
/// handed to the handler in order.
#[allow(dead_code)]
pub struct ScriptedStore {
    pub version: PlatformVersion,
    pub sample_response: ScriptedResponse,
    pub location_script: Mutex<HashMap<String, Vec<Delivery<RouteLocation>>>>,
    pub calls: AtomicUsize,
}

#[allow(dead_code)]
impl ScriptedStore {
    pub fn new(sample_response: ScriptedResponse) -> Self {
        Self {
            version: PlatformVersion::new(18, 0),
            sample_response,
            location_script: Mutex::new(HashMap::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn script_locations(&self, route_id: &str, deliveries: Vec<Delivery<RouteLocation>>) {
        self.location_script
            .lock()
            .unwrap()
            .insert(route_id.to_string(), deliveries);
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl HealthStore for ScriptedStore {
    fn platform_version(&self) -> PlatformVersion {
        self.version
    }

    fn query_samples(&self, _query: SampleQuery, mut handler: QueryHandler<StoredSample>) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.sample_response.clone() {
            ScriptedResponse::Results(samples) => handler(Delivery::results(samples)),
            ScriptedResponse::Error(e) => handler(Delivery::failed(e)),
            ScriptedResponse::Empty => handler(Delivery::empty()),
        }
    }

    fn query_route_locations(&self, route: &RouteSample, mut handler: QueryHandler<RouteLocation>) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let deliveries = self
            .location_script
            .lock()
            .unwrap()
            .remove(&route.id)
            .unwrap_or_else(|| vec![Delivery::batch(Vec::new(), true)]);
        for delivery in deliveries {
            handler(delivery);
        }
    }

    fn delete_sample(&self, _sample_id: &str, completion: CompletionHandler<()>) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        completion(Ok(()));
    }

    fn relate_samples(
        &self,
        _samples: Vec<QuantitySample>,
        _workout: &Workout,
        completion: CompletionHandler<()>,
    ) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        completion(Ok(()));
    }

    fn save_route(
        &self,
        workout: &Workout,
        _locations: Vec<RouteLocation>,
        completion: CompletionHandler<RouteSample>,
    ) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        completion(Ok(route_sample("scripted", &workout.id, None)));
    }

    fn query_workout_plan(
        &self,
        _workout: &Workout,
        completion: CompletionHandler<Option<WorkoutPlan>>,
    ) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        completion(Ok(None));
    }

    /// Distance in "index units": difference of latitudes scaled up.
    fn distance_between(&self, from: &RouteLocation, to: &RouteLocation) -> f64 {
        ((to.latitude - from.latitude) * 10_000.0).round()
    }
}
