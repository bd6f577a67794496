// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};

use super::extract::{EventNamePath, ValidatedJson};
use crate::{
    auth::{InvestorOnly, OrganiserOnly, RequireRole},
    error::{ApiError, ErrorBody},
    models::{
        AccessRequestResponse, ApproveAccessRequest, EnrollmentResponse, RequestAccessRequest,
        ShortlistRequest,
    },
    state::AppState,
    storage::{
        AccessRepository, AccessRequestRecord, EnrollmentRepository, EventRepository,
        OwnershipCheck, ShortlistRepository, StorageError,
    },
};

/// Ask an event's organiser for access to its enrollments.
#[utoipa::path(
    post,
    path = "/investors/request-access",
    request_body = RequestAccessRequest,
    tag = "Investors",
    security(("bearer_auth" = [])),
    responses(
        (status = 201, body = AccessRequestResponse),
        (status = 404, description = "Event not found", body = ErrorBody),
        (status = 409, description = "Access already requested", body = ErrorBody)
    )
)]
pub async fn request_access(
    RequireRole(user): InvestorOnly,
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RequestAccessRequest>,
) -> Result<(StatusCode, Json<AccessRequestResponse>), ApiError> {
    let access = AccessRequestRecord::pending(request.event_name, user.email);

    AccessRepository::new(&state.db)
        .create(&access)
        .map_err(|e| match e {
            StorageError::AlreadyExists(_) => ApiError::conflict("Access already requested"),
            other => ApiError::from(other),
        })?;

    tracing::info!(
        event = %access.event_name,
        investor = %access.investor_email,
        "Access requested"
    );
    Ok((StatusCode::CREATED, Json(access.into())))
}

/// Access requests for one of the caller's events, newest first.
#[utoipa::path(
    get,
    path = "/investors/requests/{event_name}",
    params(("event_name" = String, Path, description = "Name of the event")),
    tag = "Investors",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, body = [AccessRequestResponse]),
        (status = 403, description = "Caller does not own the event", body = ErrorBody),
        (status = 404, body = ErrorBody)
    )
)]
pub async fn list_access_requests(
    RequireRole(user): OrganiserOnly,
    State(state): State<AppState>,
    EventNamePath(event_name): EventNamePath,
) -> Result<Json<Vec<AccessRequestResponse>>, ApiError> {
    EventRepository::new(&state.db)
        .get(&event_name)
        .verify_owner(&user)?;

    let requests = AccessRepository::new(&state.db).list_by_event(&event_name)?;
    Ok(Json(requests.into_iter().map(AccessRequestResponse::from).collect()))
}

/// Approve (`approve: true`) or reject an investor's access request.
#[utoipa::path(
    post,
    path = "/investors/approve",
    request_body = ApproveAccessRequest,
    tag = "Investors",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, body = AccessRequestResponse),
        (status = 403, description = "Caller does not own the event", body = ErrorBody),
        (status = 404, description = "Event or request not found", body = ErrorBody)
    )
)]
pub async fn approve_access(
    RequireRole(user): OrganiserOnly,
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<ApproveAccessRequest>,
) -> Result<Json<AccessRequestResponse>, ApiError> {
    let decided = AccessRepository::new(&state.db).decide(
        &request.event_name,
        &user,
        &request.investor_email,
        request.approve,
    )?;

    tracing::info!(
        event = %decided.event_name,
        investor = %decided.investor_email,
        approved = decided.is_approved(),
        "Access request decided"
    );
    Ok(Json(decided.into()))
}

/// Enrolled startups of an event the caller has been approved for.
///
/// `shortlisted` reflects only the caller's own shortlist.
#[utoipa::path(
    get,
    path = "/investors/event/{event_name}",
    params(("event_name" = String, Path, description = "Name of the event")),
    tag = "Investors",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, body = [EnrollmentResponse]),
        (status = 403, description = "Access not approved", body = ErrorBody),
        (status = 404, description = "Event not found", body = ErrorBody)
    )
)]
pub async fn event_startups(
    RequireRole(user): InvestorOnly,
    State(state): State<AppState>,
    EventNamePath(event_name): EventNamePath,
) -> Result<Json<Vec<EnrollmentResponse>>, ApiError> {
    EventRepository::new(&state.db).get(&event_name)?;

    if !AccessRepository::new(&state.db).is_approved(&event_name, &user.email)? {
        return Err(ApiError::forbidden("Access not approved for this event"));
    }

    let mine = ShortlistRepository::new(&state.db).shortlisted_by(&event_name, &user.email)?;
    let enrollments = EnrollmentRepository::new(&state.db).list_by_event(&event_name)?;
    Ok(Json(
        enrollments
            .into_iter()
            .map(|e| {
                let shortlisted = mine.contains(&e.startup_email);
                EnrollmentResponse::for_investor(e, shortlisted)
            })
            .collect(),
    ))
}

/// Shortlist an enrolled startup after the event has closed.
#[utoipa::path(
    post,
    path = "/investors/shortlist",
    request_body = ShortlistRequest,
    tag = "Investors",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, body = EnrollmentResponse),
        (status = 403, description = "Access not approved", body = ErrorBody),
        (status = 404, description = "Event or enrollment not found", body = ErrorBody),
        (status = 409, description = "Event is not closed yet", body = ErrorBody)
    )
)]
pub async fn shortlist(
    RequireRole(user): InvestorOnly,
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<ShortlistRequest>,
) -> Result<Json<EnrollmentResponse>, ApiError> {
    let enrollment = ShortlistRepository::new(&state.db)
        .shortlist(&request.event_name, &user, &request.startup_email)
        .map_err(|e| match e {
            StorageError::PermissionDenied { .. } => {
                ApiError::forbidden("Access not approved for this event")
            }
            other => ApiError::from(other),
        })?;

    tracing::info!(
        event = %enrollment.event_name,
        startup = %enrollment.startup_email,
        investor = %user.email,
        "Startup shortlisted"
    );
    Ok(Json(EnrollmentResponse::for_investor(enrollment, true)))
}
