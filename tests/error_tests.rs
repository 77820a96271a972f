// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::http::StatusCode;
use axum::response::IntoResponse;
use workout_kit::db::StoreError;
use workout_kit::error::AppError;
use workout_kit::models::{EffortScore, PlatformVersion};
use workout_kit::services::Operation;

fn status_of(err: AppError) -> StatusCode {
    err.into_response().status()
}

#[test]
fn test_is_unrecognized_selector_matches() {
    let err = AppError::Store(StoreError::UnrecognizedSelector("relate".to_string()));
    assert!(err.is_unrecognized_selector());
}

#[test]
fn test_is_unrecognized_selector_no_match() {
    let err = AppError::Store(StoreError::NotAuthorized("sample".to_string()));
    assert!(!err.is_unrecognized_selector());

    let err = AppError::Unsupported {
        operation: Operation::SetEffortScore,
        required: PlatformVersion::new(18, 0),
        current: PlatformVersion::new(17, 4),
    };
    assert!(!err.is_unrecognized_selector());

    assert!(!AppError::EmptyResponse.is_unrecognized_selector());
}

#[test]
fn test_status_codes() {
    let invalid = EffortScore::try_from(12.0).unwrap_err();
    assert_eq!(status_of(AppError::from(invalid)), StatusCode::BAD_REQUEST);
    assert_eq!(
        status_of(AppError::BadRequest("x".to_string())),
        StatusCode::BAD_REQUEST
    );
    assert_eq!(
        status_of(AppError::Unsupported {
            operation: Operation::GetWorkoutPlan,
            required: PlatformVersion::new(17, 0),
            current: PlatformVersion::new(16, 4),
        }),
        StatusCode::NOT_IMPLEMENTED
    );
    assert_eq!(status_of(AppError::EmptyResponse), StatusCode::BAD_GATEWAY);
    assert_eq!(
        status_of(StoreError::NotAuthorized("x".to_string()).into()),
        StatusCode::FORBIDDEN
    );
    assert_eq!(
        status_of(StoreError::NotFound("x".to_string()).into()),
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        status_of(StoreError::Io("x".to_string()).into()),
        StatusCode::BAD_GATEWAY
    );
    assert_eq!(
        status_of(AppError::NotFound("x".to_string())),
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        status_of(anyhow::anyhow!("boom").into()),
        StatusCode::INTERNAL_SERVER_ERROR
    );
}

#[test]
fn test_unsupported_message_names_versions() {
    let err = AppError::Unsupported {
        operation: Operation::SetEffortScore,
        required: PlatformVersion::new(18, 0),
        current: PlatformVersion::new(17, 4),
    };
    assert_eq!(
        err.to_string(),
        "set_effort_score requires platform version 18.0 or later (running 17.4)"
    );
}
