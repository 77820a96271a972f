// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Effort score service.
//!
//! The store has no way to update a sample in place, so setting a score
//! replaces it:
//! 1. Query effort samples related to the workout
//! 2. Delete each one (samples owned by other apps cannot be deleted; those
//!    failures are ignored)
//! 3. Relate a new sample spanning the workout
//!
//! Reads take the last related sample in store order, which is the newest.

use crate::db::{HealthStore, SamplePredicate, SampleQuery, SampleType, StoreError, StoredSample};
use crate::error::{AppError, Result};
use crate::models::{EffortScore, EffortScoreReading, QuantitySample, QuantityType, Workout};
use crate::services::bridge;
use crate::services::capability::{CapabilityGate, Operation};
use std::sync::Arc;

/// Reads and replaces workout effort scores.
#[derive(Clone)]
pub struct EffortScoreService {
    store: Arc<dyn HealthStore>,
    gate: CapabilityGate,
}

impl EffortScoreService {
    pub fn new(store: Arc<dyn HealthStore>, gate: CapabilityGate) -> Self {
        Self { store, gate }
    }

    /// Read the current effort score of `workout`.
    ///
    /// Returns [`EffortScoreReading::Unavailable`] when the platform cannot
    /// store effort scores, whether the gate says so up front or the store
    /// rejects the call.
    pub async fn get_effort_score(&self, workout: &Workout) -> Result<EffortScoreReading> {
        if !self.gate.is_supported(Operation::GetEffortScore) {
            tracing::debug!(
                workout_id = %workout.id,
                platform = %self.gate.platform_version(),
                "Effort score unavailable on this platform"
            );
            return Ok(EffortScoreReading::Unavailable);
        }

        let samples = match self.related_samples(workout).await {
            Ok(samples) => samples,
            Err(e) if e.is_unrecognized_selector() => {
                tracing::warn!(
                    workout_id = %workout.id,
                    error = %e,
                    "Store does not support effort scores"
                );
                return Ok(EffortScoreReading::Unavailable);
            }
            Err(e) => return Err(e),
        };

        match samples.last() {
            Some(sample) => {
                let score = EffortScore::try_from(sample.value.round()).map_err(|_| {
                    AppError::Store(StoreError::Other(format!(
                        "stored effort score {} is out of range",
                        sample.value
                    )))
                })?;
                Ok(EffortScoreReading::Recorded(score))
            }
            None => Ok(EffortScoreReading::Absent),
        }
    }

    /// Replace the effort score of `workout` with `score`.
    ///
    /// `score` is validated before anything else happens. Only the final
    /// relate step can fail the operation once existing samples are known.
    pub async fn set_effort_score(&self, workout: &Workout, score: f64) -> Result<()> {
        let score = EffortScore::try_from(score)?;
        self.gate.ensure_supported(Operation::SetEffortScore)?;

        let existing = self
            .related_samples(workout)
            .await
            .map_err(|e| self.map_unsupported(e))?;

        for sample in &existing {
            let result =
                bridge::completion(|done| self.store.delete_sample(&sample.id, done)).await;
            match result {
                Ok(()) => {
                    tracing::debug!(workout_id = %workout.id, sample_id = %sample.id, "Deleted effort sample")
                }
                Err(e) => tracing::debug!(
                    workout_id = %workout.id,
                    sample_id = %sample.id,
                    error = %e,
                    "Could not delete effort sample, leaving it in place"
                ),
            }
        }

        let sample = QuantitySample::effort_score(score, workout.start_date, workout.end_date);
        bridge::completion(|done| self.store.relate_samples(vec![sample], workout, done))
            .await
            .map_err(|e| self.map_unsupported(e))?;

        tracing::info!(
            workout_id = %workout.id,
            score = score.value(),
            replaced = existing.len(),
            "Effort score set"
        );
        Ok(())
    }

    /// Effort score samples related to `workout`, in store order.
    async fn related_samples(&self, workout: &Workout) -> Result<Vec<QuantitySample>> {
        let query = SampleQuery::new(
            SampleType::EffortScore,
            SamplePredicate::RelatedToWorkout {
                workout_id: workout.id.clone(),
                activity_type: None,
            },
        );

        let samples = bridge::single_shot(|handler| self.store.query_samples(query, handler)).await?;

        Ok(samples
            .into_iter()
            .filter_map(|sample| match sample {
                StoredSample::Quantity(q) if q.quantity_type == QuantityType::WorkoutEffortScore => {
                    Some(q)
                }
                _ => None,
            })
            .collect())
    }

    fn map_unsupported(&self, error: AppError) -> AppError {
        if error.is_unrecognized_selector() {
            self.gate
                .unsupported_on(Operation::SetEffortScore, self.store.platform_version())
        } else {
            error
        }
    }
}
