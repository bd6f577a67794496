// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use chrono::Utc;

use super::extract::{EventNamePath, ValidatedJson};
use crate::{
    auth::{OrganiserOnly, ParticipantOnly, RequireRole},
    error::{ApiError, ErrorBody},
    models::{CreateEventRequest, EnrollmentResponse, UpdateEventStatusRequest},
    state::AppState,
    storage::{
        EnrollmentRepository, EventRecord, EventRepository, EventStatus, OwnershipCheck,
        StorageError,
    },
};

#[utoipa::path(
    post,
    path = "/events",
    request_body = CreateEventRequest,
    tag = "Events",
    security(("bearer_auth" = [])),
    responses(
        (status = 201, body = EventRecord),
        (status = 403, description = "Caller is not an organiser", body = ErrorBody),
        (status = 409, description = "Event name already exists", body = ErrorBody)
    )
)]
pub async fn create_event(
    RequireRole(user): OrganiserOnly,
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateEventRequest>,
) -> Result<(StatusCode, Json<EventRecord>), ApiError> {
    let event = EventRecord {
        name: request.name,
        description: request.description,
        image_url: request.image_url,
        event_datetime: request.event_datetime,
        terms_and_conditions: request.terms_and_conditions,
        status: EventStatus::Upcoming,
        organiser_email: user.email,
        created_at: Utc::now(),
    };

    EventRepository::new(&state.db)
        .create(&event)
        .map_err(|e| match e {
            StorageError::AlreadyExists(_) => ApiError::conflict("Event name already exists"),
            other => ApiError::from(other),
        })?;

    tracing::info!(event = %event.name, organiser = %event.organiser_email, "Event created");
    Ok((StatusCode::CREATED, Json(event)))
}

/// All events, earliest first.
#[utoipa::path(
    get,
    path = "/events",
    tag = "Events",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, body = [EventRecord]),
        (status = 403, description = "Caller is not a startup or investor", body = ErrorBody)
    )
)]
pub async fn list_events(
    RequireRole(_user): ParticipantOnly,
    State(state): State<AppState>,
) -> Result<Json<Vec<EventRecord>>, ApiError> {
    Ok(Json(EventRepository::new(&state.db).list_all()?))
}

/// Events created by the caller, earliest first.
#[utoipa::path(
    get,
    path = "/events/my",
    tag = "Events",
    security(("bearer_auth" = [])),
    responses((status = 200, body = [EventRecord]))
)]
pub async fn my_events(
    RequireRole(user): OrganiserOnly,
    State(state): State<AppState>,
) -> Result<Json<Vec<EventRecord>>, ApiError> {
    Ok(Json(
        EventRepository::new(&state.db).list_by_organiser(&user.email)?,
    ))
}

/// Close an event. Closed events never reopen.
#[utoipa::path(
    post,
    path = "/events/update-status",
    request_body = UpdateEventStatusRequest,
    tag = "Events",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, body = EventRecord),
        (status = 403, description = "Caller does not own the event", body = ErrorBody),
        (status = 404, body = ErrorBody),
        (status = 409, description = "Closed events cannot reopen", body = ErrorBody)
    )
)]
pub async fn update_event_status(
    RequireRole(user): OrganiserOnly,
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<UpdateEventStatusRequest>,
) -> Result<Json<EventRecord>, ApiError> {
    let event = EventRepository::new(&state.db).update_status(
        &request.event_name,
        &user,
        request.status,
    )?;

    tracing::info!(event = %event.name, status = %event.status, "Event status updated");
    Ok(Json(event))
}

/// Enrollments for one of the caller's events, newest first.
#[utoipa::path(
    get,
    path = "/events/{event_name}/enrollments",
    params(("event_name" = String, Path, description = "Name of the event")),
    tag = "Events",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, body = [EnrollmentResponse]),
        (status = 403, description = "Caller does not own the event", body = ErrorBody),
        (status = 404, body = ErrorBody)
    )
)]
pub async fn event_enrollments(
    RequireRole(user): OrganiserOnly,
    State(state): State<AppState>,
    EventNamePath(event_name): EventNamePath,
) -> Result<Json<Vec<EnrollmentResponse>>, ApiError> {
    EventRepository::new(&state.db)
        .get(&event_name)
        .verify_owner(&user)?;

    let enrollments = EnrollmentRepository::new(&state.db).list_by_event(&event_name)?;
    Ok(Json(enrollments.into_iter().map(EnrollmentResponse::from).collect()))
}
