// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Effort score model (subjective 1-10 workout intensity).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const MIN_EFFORT_SCORE: u8 = 1;
pub const MAX_EFFORT_SCORE: u8 = 10;

/// Unit tag the store uses for effort score quantities.
pub const EFFORT_SCORE_UNIT: &str = "appleEffortScore";

/// True iff `value` is an integer in `[1, 10]`.
pub fn is_valid_score(value: f64) -> bool {
    value.is_finite()
        && value.fract() == 0.0
        && value >= MIN_EFFORT_SCORE as f64
        && value <= MAX_EFFORT_SCORE as f64
}

/// A validated effort score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct EffortScore(u8);

impl EffortScore {
    pub fn new(value: u8) -> Result<Self, EffortScoreError> {
        Self::try_from(value as f64)
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl TryFrom<f64> for EffortScore {
    type Error = EffortScoreError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if is_valid_score(value) {
            Ok(Self(value as u8))
        } else {
            Err(EffortScoreError::OutOfRange(value))
        }
    }
}

/// Scores arriving as untyped JSON: anything but a number is rejected here
/// rather than by the body extractor.
impl TryFrom<&serde_json::Value> for EffortScore {
    type Error = EffortScoreError;

    fn try_from(value: &serde_json::Value) -> Result<Self, Self::Error> {
        match value.as_f64() {
            Some(score) => Self::try_from(score),
            None => Err(EffortScoreError::NotANumber(value.to_string())),
        }
    }
}

impl fmt::Display for EffortScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EffortScoreError {
    #[error("effort score must be an integer between 1 and 10, got {0}")]
    OutOfRange(f64),

    #[error("effort score must be a number, got {0}")]
    NotANumber(String),
}

/// Quantity sample types the store knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuantityType {
    WorkoutEffortScore,
    EstimatedWorkoutEffortScore,
    HeartRate,
}

/// A single quantity sample stored in the health store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuantitySample {
    pub id: String,
    pub quantity_type: QuantityType,
    pub value: f64,
    pub unit: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    /// Bundle identifier of the application that created the sample
    pub source_id: String,
}

impl QuantitySample {
    /// New effort score sample spanning the given workout interval.
    ///
    /// The id is generated here; `source_id` is left empty for the store to
    /// stamp on save.
    pub fn effort_score(
        score: EffortScore,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            quantity_type: QuantityType::WorkoutEffortScore,
            value: score.value() as f64,
            unit: EFFORT_SCORE_UNIT.to_string(),
            start_date,
            end_date,
            source_id: String::new(),
        }
    }
}

/// Outcome of reading a workout's effort score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffortScoreReading {
    Recorded(EffortScore),
    /// No effort score sample is related to the workout
    Absent,
    /// The platform cannot store effort scores
    Unavailable,
}

impl EffortScoreReading {
    pub fn score(&self) -> Option<EffortScore> {
        match self {
            EffortScoreReading::Recorded(score) => Some(*score),
            _ => None,
        }
    }

    pub fn is_available(&self) -> bool {
        !matches!(self, EffortScoreReading::Unavailable)
    }
}
