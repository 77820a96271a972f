// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod effort;
pub mod plan;
pub mod platform;
pub mod route;
pub mod workout;

pub use effort::{EffortScore, EffortScoreReading, QuantitySample, QuantityType};
pub use plan::WorkoutPlan;
pub use platform::PlatformVersion;
pub use route::{LocationSample, Route, RouteLocation, RouteSample};
pub use workout::{ActivityType, Quantity, Workout};
