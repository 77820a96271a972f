// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Route reconstruction service.
//!
//! Handles the core workflow:
//! 1. Query route samples attached to the workout (single-shot)
//! 2. For each route, stream its locations (incremental)
//! 3. Annotate each location with the distance from its predecessor
//!
//! Routes and their location queries are processed one at a time, in the
//! order the store returns them.

use crate::db::{HealthStore, SamplePredicate, SampleQuery, SampleType, StoredSample};
use crate::error::{AppError, Result};
use crate::models::{LocationSample, Route, RouteLocation, RouteSample, Workout};
use crate::services::bridge;
use std::sync::Arc;

/// Reads and writes workout routes.
#[derive(Clone)]
pub struct RouteService {
    store: Arc<dyn HealthStore>,
}

impl RouteService {
    pub fn new(store: Arc<dyn HealthStore>) -> Self {
        Self { store }
    }

    /// Reconstruct every route recorded for `workout`.
    ///
    /// A workout without routes yields an empty list. Any failure fails the
    /// whole call; partial route lists are never returned.
    pub async fn get_workout_routes(&self, workout: &Workout) -> Result<Vec<Route>> {
        let query = SampleQuery::new(
            SampleType::WorkoutRoute,
            SamplePredicate::ForWorkout(workout.id.clone()),
        );

        let samples = bridge::single_shot(|handler| self.store.query_samples(query, handler)).await?;

        let route_samples: Vec<RouteSample> = samples
            .into_iter()
            .filter_map(|sample| match sample {
                StoredSample::Route(route) => Some(route),
                _ => None,
            })
            .collect();

        if route_samples.is_empty() {
            tracing::debug!(workout_id = %workout.id, "Workout has no routes");
            return Ok(Vec::new());
        }

        let mut routes = Vec::with_capacity(route_samples.len());
        for sample in route_samples {
            let locations =
                bridge::incremental(|handler| self.store.query_route_locations(&sample, handler))
                    .await?;

            tracing::debug!(
                workout_id = %workout.id,
                route_id = %sample.id,
                locations = locations.len(),
                "Fetched route locations"
            );

            routes.push(Route {
                workout_id: workout.id.clone(),
                sync_identifier: sample.sync_identifier,
                sync_version: sample.sync_version,
                locations: annotate_locations(locations, |a, b| {
                    self.store.distance_between(a, b)
                }),
            });
        }

        tracing::info!(
            workout_id = %workout.id,
            routes = routes.len(),
            "Reconstructed workout routes"
        );
        Ok(routes)
    }

    /// Attach a new route to `workout`.
    ///
    /// Locations are validated locally before the store is contacted.
    pub async fn save_workout_route(
        &self,
        workout: &Workout,
        locations: Vec<RouteLocation>,
    ) -> Result<bool> {
        if locations.is_empty() {
            return Err(AppError::BadRequest(
                "Route must contain at least one location".to_string(),
            ));
        }
        if let Some(index) = locations.iter().position(|l| !l.is_valid()) {
            return Err(AppError::BadRequest(format!(
                "Location {} has invalid coordinates",
                index
            )));
        }

        let count = locations.len();
        let route =
            bridge::completion(|done| self.store.save_route(workout, locations, done)).await?;

        tracing::info!(
            workout_id = %workout.id,
            route_id = %route.id,
            locations = count,
            "Saved workout route"
        );
        Ok(true)
    }
}

/// Pair each location with its distance from the one before it.
///
/// The first location has no distance. Order is preserved as given.
pub fn annotate_locations<F>(locations: Vec<RouteLocation>, distance_fn: F) -> Vec<LocationSample>
where
    F: Fn(&RouteLocation, &RouteLocation) -> f64,
{
    let mut annotated: Vec<LocationSample> = Vec::with_capacity(locations.len());
    for location in locations {
        let distance = annotated
            .last()
            .map(|previous| distance_fn(&previous.location, &location));
        annotated.push(LocationSample { location, distance });
    }
    annotated
}
