// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Workout lookup by identifier.

use crate::db::{HealthStore, SamplePredicate, SampleQuery, SampleType, StoredSample};
use crate::error::{AppError, Result};
use crate::models::Workout;
use crate::services::bridge;
use std::sync::Arc;

#[derive(Clone)]
pub struct WorkoutService {
    store: Arc<dyn HealthStore>,
}

impl WorkoutService {
    pub fn new(store: Arc<dyn HealthStore>) -> Self {
        Self { store }
    }

    /// Fetch a workout by its UUID.
    pub async fn get_workout(&self, workout_id: &str) -> Result<Workout> {
        let id = parse_workout_id(workout_id)?;

        let mut query = SampleQuery::new(SampleType::Workout, SamplePredicate::ById(id.clone()));
        query.limit = Some(1);

        let samples = bridge::single_shot(|handler| self.store.query_samples(query, handler)).await?;

        samples
            .into_iter()
            .find_map(|sample| match sample {
                StoredSample::Workout(workout) => Some(*workout),
                _ => None,
            })
            .ok_or_else(|| AppError::NotFound(format!("Workout {} not found", id)))
    }
}

/// Reject anything that is not UUID-shaped. The id is otherwise kept as given,
/// since the store matches it verbatim.
fn parse_workout_id(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    uuid::Uuid::parse_str(trimmed)
        .map(|_| trimmed.to_string())
        .map_err(|_| AppError::BadRequest(format!("Invalid workout id: {}", raw)))
}
