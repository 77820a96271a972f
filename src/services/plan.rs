// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Workout plan lookup.

use crate::db::HealthStore;
use crate::error::Result;
use crate::models::{Workout, WorkoutPlan};
use crate::services::bridge;
use crate::services::capability::{CapabilityGate, Operation};
use std::sync::Arc;

#[derive(Clone)]
pub struct PlanService {
    store: Arc<dyn HealthStore>,
    gate: CapabilityGate,
}

impl PlanService {
    pub fn new(store: Arc<dyn HealthStore>, gate: CapabilityGate) -> Self {
        Self { store, gate }
    }

    /// Plan the workout was performed against, if any.
    ///
    /// Fails with `AppError::Unsupported` on platforms without plans rather
    /// than reporting "no plan".
    pub async fn get_workout_plan(&self, workout: &Workout) -> Result<Option<WorkoutPlan>> {
        self.gate.ensure_supported(Operation::GetWorkoutPlan)?;

        bridge::completion(|done| self.store.query_workout_plan(workout, done))
            .await
            .map_err(|e| {
                if e.is_unrecognized_selector() {
                    self.gate
                        .unsupported_on(Operation::GetWorkoutPlan, self.store.platform_version())
                } else {
                    e
                }
            })
    }
}
