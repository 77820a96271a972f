// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Workout record as owned by the health store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of activity recorded by a workout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    Running,
    Walking,
    Hiking,
    Cycling,
    Swimming,
    Rowing,
    Elliptical,
    Yoga,
    TraditionalStrengthTraining,
    HighIntensityIntervalTraining,
    #[serde(other)]
    Other,
}

impl ActivityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityType::Running => "running",
            ActivityType::Walking => "walking",
            ActivityType::Hiking => "hiking",
            ActivityType::Cycling => "cycling",
            ActivityType::Swimming => "swimming",
            ActivityType::Rowing => "rowing",
            ActivityType::Elliptical => "elliptical",
            ActivityType::Yoga => "yoga",
            ActivityType::TraditionalStrengthTraining => "traditional_strength_training",
            ActivityType::HighIntensityIntervalTraining => "high_intensity_interval_training",
            ActivityType::Other => "other",
        }
    }
}

/// A unit-tagged scalar (e.g. 5012.3 "m", 412 "kcal").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quantity {
    pub value: f64,
    pub unit: String,
}

impl Quantity {
    pub fn new(value: f64, unit: impl Into<String>) -> Self {
        Self {
            value,
            unit: unit.into(),
        }
    }
}

/// Recording device metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeviceInfo {
    pub name: Option<String>,
    pub manufacturer: Option<String>,
    pub model: Option<String>,
    pub hardware_version: Option<String>,
    pub software_version: Option<String>,
}

/// Application and OS build that wrote the workout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceRevision {
    /// Bundle identifier of the writing application
    pub source_id: String,
    pub source_name: String,
    pub version: Option<String>,
    pub product_type: Option<String>,
}

/// Timeline marker inside a workout (pause, lap, segment...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutEvent {
    pub event_type: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

/// Sub-activity of a multi-sport workout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutActivity {
    pub activity_type: ActivityType,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
}

/// A recorded workout. Owned by the store; only read here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workout {
    /// UUID-shaped identifier assigned by the store
    pub id: String,
    pub activity_type: ActivityType,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub duration_seconds: f64,
    #[serde(default)]
    pub total_distance: Option<Quantity>,
    #[serde(default)]
    pub total_energy_burned: Option<Quantity>,
    #[serde(default)]
    pub total_swimming_stroke_count: Option<Quantity>,
    #[serde(default)]
    pub total_flights_climbed: Option<Quantity>,
    #[serde(default)]
    pub device: Option<DeviceInfo>,
    #[serde(default)]
    pub source_revision: Option<SourceRevision>,
    #[serde(default)]
    pub events: Vec<WorkoutEvent>,
    #[serde(default)]
    pub activities: Vec<WorkoutActivity>,
}

impl Workout {
    /// Minimal workout spanning `start_date..end_date`.
    pub fn new(
        id: impl Into<String>,
        activity_type: ActivityType,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
    ) -> Self {
        let duration_seconds = (end_date - start_date).num_milliseconds() as f64 / 1000.0;
        Self {
            id: id.into(),
            activity_type,
            start_date,
            end_date,
            duration_seconds,
            total_distance: None,
            total_energy_burned: None,
            total_swimming_stroke_count: None,
            total_flights_climbed: None,
            device: None,
            source_revision: None,
            events: Vec::new(),
            activities: Vec::new(),
        }
    }
}
