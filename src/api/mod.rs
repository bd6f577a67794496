// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    http::{header::InvalidHeaderValue, HeaderValue},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi, ToSchema,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::Role,
    error::ErrorBody,
    models::{
        AccessRequestResponse, ApproveAccessRequest, CreateEnrollmentRequest, CreateEventRequest,
        EnrollmentResponse, LoginRequest, RegisterRequest, RequestAccessRequest,
        ShortlistRequest, TokenResponse, UpdateEventStatusRequest, UserProfile,
    },
    state::AppState,
    storage::{AccessStatus, EnrollmentStatus, EventRecord, EventStatus},
};

pub mod auth;
pub mod enrollments;
pub mod events;
pub mod extract;
pub mod health;
pub mod investors;

/// Service banner.
#[derive(Debug, Serialize, ToSchema)]
pub struct RootResponse {
    pub message: String,
    pub version: String,
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Health",
    responses((status = 200, body = RootResponse))
)]
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "Pitch event management API".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// CORS policy for the frontend origin; `*` allows any origin.
pub fn cors_layer(allowed_origin: &str) -> Result<CorsLayer, InvalidHeaderValue> {
    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if allowed_origin == "*" {
        Ok(cors.allow_origin(Any))
    } else {
        Ok(cors.allow_origin(HeaderValue::from_str(allowed_origin)?))
    }
}

pub fn router(state: AppState, cors: CorsLayer) -> Router {
    let routes = Router::new()
        .route("/", get(root))
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/me", get(auth::me))
        .route(
            "/events",
            get(events::list_events).post(events::create_event),
        )
        .route("/events/my", get(events::my_events))
        .route("/events/update-status", post(events::update_event_status))
        .route(
            "/events/{event_name}/enrollments",
            get(events::event_enrollments),
        )
        .route("/enrollments", post(enrollments::create_enrollment))
        .route("/enrollments/my", get(enrollments::my_enrollments))
        .route("/investors/request-access", post(investors::request_access))
        .route(
            "/investors/requests/{event_name}",
            get(investors::list_access_requests),
        )
        .route("/investors/approve", post(investors::approve_access))
        .route("/investors/event/{event_name}", get(investors::event_startups))
        .route("/investors/shortlist", post(investors::shortlist))
        .with_state(state);

    Router::new()
        .merge(routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(cors)
}

/// Registers the bearer token scheme referenced by protected paths.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    paths(
        root,
        health::health,
        health::liveness,
        health::readiness,
        auth::register,
        auth::login,
        auth::me,
        events::create_event,
        events::list_events,
        events::my_events,
        events::update_event_status,
        events::event_enrollments,
        enrollments::create_enrollment,
        enrollments::my_enrollments,
        investors::request_access,
        investors::list_access_requests,
        investors::approve_access,
        investors::event_startups,
        investors::shortlist
    ),
    components(
        schemas(
            Role,
            EventStatus,
            EnrollmentStatus,
            AccessStatus,
            EventRecord,
            ErrorBody,
            RootResponse,
            RegisterRequest,
            LoginRequest,
            TokenResponse,
            UserProfile,
            CreateEventRequest,
            UpdateEventStatusRequest,
            CreateEnrollmentRequest,
            EnrollmentResponse,
            RequestAccessRequest,
            ApproveAccessRequest,
            AccessRequestResponse,
            ShortlistRequest,
            health::ReadyResponse,
            health::HealthChecks,
            health::HealthResponse
        )
    ),
    tags(
        (name = "Health", description = "Service banner and probes"),
        (name = "Auth", description = "Registration, login and session identity"),
        (name = "Events", description = "Event catalog for organisers and participants"),
        (name = "Enrollments", description = "Startup pitches"),
        (name = "Investors", description = "Access requests and shortlists")
    )
)]
pub struct ApiDoc;
