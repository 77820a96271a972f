// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Health store layer.
//!
//! The store speaks a callback protocol: queries hand results to a
//! [`QueryHandler`] that may be invoked once or many times, and writes report
//! through a one-shot [`CompletionHandler`]. `services::bridge` turns both into
//! futures.

pub mod memory;

pub use memory::InMemoryHealthStore;

use crate::models::{
    PlatformVersion, QuantitySample, RouteLocation, RouteSample, Workout, WorkoutPlan,
};

/// Errors reported by the store itself.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StoreError {
    #[error("Not authorized: {0}")]
    NotAuthorized(String),

    /// The platform does not implement the requested call.
    #[error("Unrecognized selector: {0}")]
    UnrecognizedSelector(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("I/O failure: {0}")]
    Io(String),

    #[error("{0}")]
    Other(String),
}

/// One callback invocation from a query.
///
/// Single-shot queries deliver `items` or `error` once. Incremental queries
/// deliver batches until `done` is set.
#[derive(Debug)]
pub struct Delivery<T> {
    pub items: Option<Vec<T>>,
    pub done: bool,
    pub error: Option<StoreError>,
}

impl<T> Delivery<T> {
    /// Complete result set.
    pub fn results(items: Vec<T>) -> Self {
        Self {
            items: Some(items),
            done: true,
            error: None,
        }
    }

    /// One batch of an incremental query.
    pub fn batch(items: Vec<T>, done: bool) -> Self {
        Self {
            items: Some(items),
            done,
            error: None,
        }
    }

    pub fn failed(error: StoreError) -> Self {
        Self {
            items: None,
            done: true,
            error: Some(error),
        }
    }

    /// Neither results nor an error. Allowed by the protocol, never valid.
    pub fn empty() -> Self {
        Self {
            items: None,
            done: true,
            error: None,
        }
    }
}

/// Query result callback. May be called any number of times.
pub type QueryHandler<T> = Box<dyn FnMut(Delivery<T>) + Send + 'static>;

/// Write/lookup completion callback. Called at most once.
pub type CompletionHandler<T> = Box<dyn FnOnce(Result<T, StoreError>) + Send + 'static>;

/// Sample types that can be queried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SampleType {
    Workout,
    WorkoutRoute,
    EffortScore,
}

/// Selects which samples a query returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SamplePredicate {
    /// Sample with this exact id
    ById(String),
    /// Samples attached to this workout
    ForWorkout(String),
    /// Samples related to this workout, optionally limited to an activity type
    RelatedToWorkout {
        workout_id: String,
        activity_type: Option<crate::models::ActivityType>,
    },
}

/// Resume position for anchored queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct QueryAnchor(pub u64);

#[derive(Debug, Clone)]
pub struct SampleQuery {
    pub sample_type: SampleType,
    pub predicate: SamplePredicate,
    /// `None` starts from the beginning
    pub anchor: Option<QueryAnchor>,
    /// `None` means no limit
    pub limit: Option<usize>,
}

impl SampleQuery {
    /// Unanchored, unlimited query.
    pub fn new(sample_type: SampleType, predicate: SamplePredicate) -> Self {
        Self {
            sample_type,
            predicate,
            anchor: None,
            limit: None,
        }
    }
}

/// Anything a sample query can return.
#[derive(Debug, Clone)]
pub enum StoredSample {
    Workout(Box<Workout>),
    Route(RouteSample),
    Quantity(QuantitySample),
}

/// External health data store.
pub trait HealthStore: Send + Sync {
    fn platform_version(&self) -> PlatformVersion;

    /// Single-shot query over stored samples.
    fn query_samples(&self, query: SampleQuery, handler: QueryHandler<StoredSample>);

    /// Incremental query over a route's locations.
    fn query_route_locations(&self, route: &RouteSample, handler: QueryHandler<RouteLocation>);

    fn delete_sample(&self, sample_id: &str, completion: CompletionHandler<()>);

    /// Save `samples` and relate them to `workout`.
    fn relate_samples(
        &self,
        samples: Vec<QuantitySample>,
        workout: &Workout,
        completion: CompletionHandler<()>,
    );

    /// Build a route from `locations` and attach it to `workout`.
    fn save_route(
        &self,
        workout: &Workout,
        locations: Vec<RouteLocation>,
        completion: CompletionHandler<RouteSample>,
    );

    fn query_workout_plan(
        &self,
        workout: &Workout,
        completion: CompletionHandler<Option<WorkoutPlan>>,
    );

    /// Canonical distance in metres between two fixes.
    fn distance_between(&self, from: &RouteLocation, to: &RouteLocation) -> f64;
}
