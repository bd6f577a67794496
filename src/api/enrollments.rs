// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, http::StatusCode, Json};

use super::extract::ValidatedJson;
use crate::{
    auth::{RequireRole, StartupOnly},
    error::{ApiError, ErrorBody},
    models::{CreateEnrollmentRequest, EnrollmentResponse},
    state::AppState,
    storage::{EnrollmentRecord, EnrollmentRepository, StorageError},
};

/// Enroll the calling startup in an upcoming event.
#[utoipa::path(
    post,
    path = "/enrollments",
    request_body = CreateEnrollmentRequest,
    tag = "Enrollments",
    security(("bearer_auth" = [])),
    responses(
        (status = 201, body = EnrollmentResponse),
        (status = 403, description = "Caller is not a startup", body = ErrorBody),
        (status = 404, description = "Event not found", body = ErrorBody),
        (status = 409, description = "Already enrolled, or the event is closed", body = ErrorBody)
    )
)]
pub async fn create_enrollment(
    RequireRole(user): StartupOnly,
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateEnrollmentRequest>,
) -> Result<(StatusCode, Json<EnrollmentResponse>), ApiError> {
    let enrollment = EnrollmentRecord::new(
        request.event_name,
        user.email,
        request.idea_name,
        request.idea_description,
        request.team_details,
    );

    EnrollmentRepository::new(&state.db)
        .create(&enrollment)
        .map_err(|e| match e {
            StorageError::AlreadyExists(_) => {
                ApiError::conflict("Already enrolled in this event")
            }
            other => ApiError::from(other),
        })?;

    tracing::info!(
        event = %enrollment.event_name,
        startup = %enrollment.startup_email,
        "Enrollment submitted"
    );
    Ok((StatusCode::CREATED, Json(enrollment.into())))
}

/// The calling startup's enrollments, newest first.
#[utoipa::path(
    get,
    path = "/enrollments/my",
    tag = "Enrollments",
    security(("bearer_auth" = [])),
    responses((status = 200, body = [EnrollmentResponse]))
)]
pub async fn my_enrollments(
    RequireRole(user): StartupOnly,
    State(state): State<AppState>,
) -> Result<Json<Vec<EnrollmentResponse>>, ApiError> {
    let enrollments = EnrollmentRepository::new(&state.db).list_by_startup(&user.email)?;
    Ok(Json(enrollments.into_iter().map(EnrollmentResponse::from).collect()))
}
