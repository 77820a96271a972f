// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod bridge;
pub mod capability;
pub mod effort;
pub mod plan;
pub mod route;
pub mod workout;

pub use capability::{CapabilityGate, Operation};
pub use effort::EffortScoreService;
pub use plan::PlanService;
pub use route::RouteService;
pub use workout::WorkoutService;
