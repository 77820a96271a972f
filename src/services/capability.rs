// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Platform capability gate.
//!
//! Every version check in the crate goes through [`CapabilityGate`], backed
//! by the [`MINIMUM_VERSIONS`] table.

use crate::error::{AppError, Result};
use crate::models::PlatformVersion;
use serde::Serialize;
use std::fmt;

/// Operations exposed to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    GetWorkoutRoutes,
    SaveWorkoutRoute,
    GetWorkoutPlan,
    GetEffortScore,
    SetEffortScore,
}

impl Operation {
    pub const ALL: [Operation; 5] = [
        Operation::GetWorkoutRoutes,
        Operation::SaveWorkoutRoute,
        Operation::GetWorkoutPlan,
        Operation::GetEffortScore,
        Operation::SetEffortScore,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::GetWorkoutRoutes => "get_workout_routes",
            Operation::SaveWorkoutRoute => "save_workout_route",
            Operation::GetWorkoutPlan => "get_workout_plan",
            Operation::GetEffortScore => "get_effort_score",
            Operation::SetEffortScore => "set_effort_score",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Minimum platform version per gated operation. Operations not listed are
/// available everywhere.
pub const MINIMUM_VERSIONS: &[(Operation, PlatformVersion)] = &[
    (Operation::GetWorkoutPlan, PlatformVersion::new(17, 0)),
    (Operation::GetEffortScore, PlatformVersion::new(18, 0)),
    (Operation::SetEffortScore, PlatformVersion::new(18, 0)),
];

/// Minimum platform version for `operation`, if it is gated.
pub fn minimum_version(operation: Operation) -> Option<PlatformVersion> {
    MINIMUM_VERSIONS
        .iter()
        .find(|(op, _)| *op == operation)
        .map(|(_, version)| *version)
}

/// Support status of one operation.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CapabilityStatus {
    pub operation: Operation,
    pub supported: bool,
    pub minimum_version: Option<PlatformVersion>,
}

/// Answers whether an operation is usable on the running platform.
#[derive(Debug, Clone, Copy)]
pub struct CapabilityGate {
    platform_version: PlatformVersion,
}

impl CapabilityGate {
    pub fn new(platform_version: PlatformVersion) -> Self {
        Self { platform_version }
    }

    pub fn platform_version(&self) -> PlatformVersion {
        self.platform_version
    }

    pub fn is_supported(&self, operation: Operation) -> bool {
        minimum_version(operation).map_or(true, |min| self.platform_version >= min)
    }

    /// `Ok(())` if supported, otherwise [`AppError::Unsupported`].
    pub fn ensure_supported(&self, operation: Operation) -> Result<()> {
        if self.is_supported(operation) {
            return Ok(());
        }
        Err(self.unsupported(operation))
    }

    /// The capability-unavailable error for `operation` on this platform.
    pub fn unsupported(&self, operation: Operation) -> AppError {
        self.unsupported_on(operation, self.platform_version)
    }

    /// Same as [`unsupported`](Self::unsupported), for when the store turned
    /// the call away and its own `current` version is the one to report.
    pub fn unsupported_on(&self, operation: Operation, current: PlatformVersion) -> AppError {
        AppError::Unsupported {
            operation,
            required: minimum_version(operation).unwrap_or(current),
            current,
        }
    }

    pub fn capabilities(&self) -> Vec<CapabilityStatus> {
        Operation::ALL
            .iter()
            .map(|&operation| CapabilityStatus {
                operation,
                supported: self.is_supported(operation),
                minimum_version: minimum_version(operation),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ungated_operations_always_supported() {
        let gate = CapabilityGate::new(PlatformVersion::new(13, 0));
        assert!(gate.is_supported(Operation::GetWorkoutRoutes));
        assert!(gate.is_supported(Operation::SaveWorkoutRoute));
    }

    #[test]
    fn test_plan_threshold() {
        assert!(!CapabilityGate::new(PlatformVersion::new(16, 4)).is_supported(Operation::GetWorkoutPlan));
        assert!(CapabilityGate::new(PlatformVersion::new(17, 0)).is_supported(Operation::GetWorkoutPlan));
    }

    #[test]
    fn test_effort_score_threshold() {
        let old = CapabilityGate::new(PlatformVersion::new(17, 5));
        let new = CapabilityGate::new(PlatformVersion::new(18, 0));
        for op in [Operation::GetEffortScore, Operation::SetEffortScore] {
            assert!(!old.is_supported(op));
            assert!(new.is_supported(op));
        }
    }

    #[test]
    fn test_ensure_supported_reports_versions() {
        let gate = CapabilityGate::new(PlatformVersion::new(17, 2));
        match gate.ensure_supported(Operation::SetEffortScore) {
            Err(AppError::Unsupported {
                operation,
                required,
                current,
            }) => {
                assert_eq!(operation, Operation::SetEffortScore);
                assert_eq!(required, PlatformVersion::new(18, 0));
                assert_eq!(current, PlatformVersion::new(17, 2));
            }
            other => panic!("expected Unsupported, got {:?}", other),
        }
    }

    #[test]
    fn test_unsupported_on_reports_given_version() {
        let gate = CapabilityGate::new(PlatformVersion::new(18, 0));
        let err = gate.unsupported_on(Operation::SetEffortScore, PlatformVersion::new(17, 4));
        assert_eq!(
            err.to_string(),
            "set_effort_score requires platform version 18.0 or later (running 17.4)"
        );
    }

    #[test]
    fn test_capabilities_lists_every_operation() {
        let gate = CapabilityGate::new(PlatformVersion::new(17, 0));
        let caps = gate.capabilities();
        assert_eq!(caps.len(), Operation::ALL.len());
        let plan = caps
            .iter()
            .find(|c| c.operation == Operation::GetWorkoutPlan)
            .unwrap();
        assert!(plan.supported);
        let effort = caps
            .iter()
            .find(|c| c.operation == Operation::GetEffortScore)
            .unwrap();
        assert!(!effort.supported);
    }
}
