// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Workout-Kit: asynchronous access to workout routes and effort scores
//!
//! This crate wraps a callback-driven health store and exposes route
//! reconstruction, effort score reads/replacement and plan lookup as futures,
//! gated on the host platform version.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use db::HealthStore;
use services::{
    CapabilityGate, EffortScoreService, PlanService, RouteService, WorkoutService,
};
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub gate: CapabilityGate,
    pub workouts: WorkoutService,
    pub routes: RouteService,
    pub effort_scores: EffortScoreService,
    pub plans: PlanService,
}

impl AppState {
    /// Wire every service to `store`, gating on `gate`.
    pub fn new(config: Config, store: Arc<dyn HealthStore>, gate: CapabilityGate) -> Self {
        Self {
            config,
            gate,
            workouts: WorkoutService::new(store.clone()),
            routes: RouteService::new(store.clone()),
            effort_scores: EffortScoreService::new(store.clone(), gate),
            plans: PlanService::new(store, gate),
        }
    }
}
