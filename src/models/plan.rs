// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Workout plan that a workout was performed against.

use crate::models::ActivityType;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutPlan {
    pub id: String,
    pub workout_id: String,
    pub activity_type: ActivityType,
    pub display_name: Option<String>,
}
