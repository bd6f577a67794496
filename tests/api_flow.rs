// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! End-to-end API tests driving the full router.
//!
//! Tests for:
//! - The organiser / startup / investor happy path
//! - Enrollment in a closed event
//! - Duplicate event names
//! - Role gating and authentication failures
//! - Lenient event date-times and padded path names

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use pitchday_server::{
    api::{cors_layer, router},
    auth::SessionIssuer,
    state::AppState,
    storage::EventDatabase,
};

fn create_test_app() -> Router {
    let db = EventDatabase::in_memory().unwrap();
    let sessions = SessionIssuer::new(b"integration-secret", "pitchday", 30);
    router(AppState::new(db, sessions), cors_layer("*").unwrap())
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

async fn register(app: &Router, email: &str, role: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/auth/register",
        None,
        Some(json!({
            "email": email,
            "password": "secret1",
            "role": role,
            "name": format!("{role} user"),
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register {email}: {body}");
    body["access_token"].as_str().unwrap().to_string()
}

async fn create_event(app: &Router, token: &str, name: &str) -> (StatusCode, Value) {
    send(
        app,
        Method::POST,
        "/events",
        Some(token),
        Some(json!({
            "name": name,
            "description": "Pitch night",
            "image_url": "https://example.com/banner.png",
            "event_datetime": "2030-05-01T18:00:00Z",
            "terms_and_conditions": "Be kind",
        })),
    )
    .await
}

async fn enroll(app: &Router, token: &str, event: &str) -> (StatusCode, Value) {
    send(
        app,
        Method::POST,
        "/enrollments",
        Some(token),
        Some(json!({
            "event_name": event,
            "idea_name": "Rocket",
            "idea_description": "Lunch delivery by rocket",
            "team_details": "Two founders",
        })),
    )
    .await
}

async fn close_event(app: &Router, token: &str, event: &str) -> (StatusCode, Value) {
    send(
        app,
        Method::POST,
        "/events/update-status",
        Some(token),
        Some(json!({ "event_name": event, "status": "closed" })),
    )
    .await
}

// ============================================================================
// Scenarios
// ============================================================================

#[tokio::test]
async fn full_pitching_flow() {
    let app = create_test_app();
    let organiser = register(&app, "o@example.com", "organiser").await;
    let startup = register(&app, "s@example.com", "startup").await;
    let investor = register(&app, "i@example.com", "investor").await;

    let (status, event) = create_event(&app, &organiser, "Demo2024").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(event["status"], "upcoming");

    let (status, events) = send(&app, Method::GET, "/events", Some(&startup), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(events.as_array().unwrap().len(), 1);

    let (status, enrollment) = enroll(&app, &startup, "Demo2024").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(enrollment["status"], "submitted");

    let (status, _) = close_event(&app, &organiser, "Demo2024").await;
    assert_eq!(status, StatusCode::OK);

    let (status, request) = send(
        &app,
        Method::POST,
        "/investors/request-access",
        Some(&investor),
        Some(json!({ "event_name": "Demo2024" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(request["approved"], false);

    let (status, requests) = send(
        &app,
        Method::GET,
        "/investors/requests/Demo2024",
        Some(&organiser),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(requests[0]["investor_email"], "i@example.com");

    let (status, decided) = send(
        &app,
        Method::POST,
        "/investors/approve",
        Some(&organiser),
        Some(json!({
            "investor_email": "i@example.com",
            "event_name": "Demo2024",
            "approve": true,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(decided["approved"], true);

    let (status, startups) = send(
        &app,
        Method::GET,
        "/investors/event/Demo2024",
        Some(&investor),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(startups[0]["startup_email"], "s@example.com");

    let (status, shortlisted) = send(
        &app,
        Method::POST,
        "/investors/shortlist",
        Some(&investor),
        Some(json!({ "event_name": "Demo2024", "startup_email": "s@example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(shortlisted["shortlisted"], true);

    let (status, mine) = send(&app, Method::GET, "/enrollments/my", Some(&startup), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(mine[0]["status"], "shortlisted");

    let (status, for_organiser) = send(
        &app,
        Method::GET,
        "/events/Demo2024/enrollments",
        Some(&organiser),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(for_organiser[0]["shortlisted"], true);
}

#[tokio::test]
async fn enrolling_in_closed_event_conflicts() {
    let app = create_test_app();
    let organiser = register(&app, "o@example.com", "organiser").await;
    let startup = register(&app, "s@example.com", "startup").await;

    create_event(&app, &organiser, "Demo2024").await;
    close_event(&app, &organiser, "Demo2024").await;

    let (status, body) = enroll(&app, &startup, "Demo2024").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error_code"], "invalid_state");

    let (_, enrollments) = send(
        &app,
        Method::GET,
        "/events/Demo2024/enrollments",
        Some(&organiser),
        None,
    )
    .await;
    assert!(enrollments.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn duplicate_event_and_enrollment_conflict() {
    let app = create_test_app();
    let organiser = register(&app, "o@example.com", "organiser").await;
    let startup = register(&app, "s@example.com", "startup").await;

    let (first, _) = create_event(&app, &organiser, "Demo2024").await;
    let (second, _) = create_event(&app, &organiser, "Demo2024").await;
    assert_eq!(first, StatusCode::CREATED);
    assert_eq!(second, StatusCode::CONFLICT);

    let (first, _) = enroll(&app, &startup, "Demo2024").await;
    let (second, _) = enroll(&app, &startup, "Demo2024").await;
    assert_eq!(first, StatusCode::CREATED);
    assert_eq!(second, StatusCode::CONFLICT);
}

#[tokio::test]
async fn startup_is_forbidden_from_other_roles_routes() {
    let app = create_test_app();
    let organiser = register(&app, "o@example.com", "organiser").await;
    let startup = register(&app, "s@example.com", "startup").await;
    create_event(&app, &organiser, "Demo2024").await;

    let (status, body) = create_event(&app, &startup, "Mine").await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error_code"], "insufficient_permissions");

    let (status, _) = close_event(&app, &startup, "Demo2024").await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &app,
        Method::POST,
        "/investors/request-access",
        Some(&startup),
        Some(json!({ "event_name": "Demo2024" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &app,
        Method::GET,
        "/investors/event/Demo2024",
        Some(&startup),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, Method::GET, "/events", Some(&organiser), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn shortlisting_before_close_conflicts() {
    let app = create_test_app();
    let organiser = register(&app, "o@example.com", "organiser").await;
    let startup = register(&app, "s@example.com", "startup").await;
    let investor = register(&app, "i@example.com", "investor").await;

    create_event(&app, &organiser, "Demo2024").await;
    enroll(&app, &startup, "Demo2024").await;
    send(
        &app,
        Method::POST,
        "/investors/request-access",
        Some(&investor),
        Some(json!({ "event_name": "Demo2024" })),
    )
    .await;
    send(
        &app,
        Method::POST,
        "/investors/approve",
        Some(&organiser),
        Some(json!({
            "investor_email": "i@example.com",
            "event_name": "Demo2024",
            "approve": true,
        })),
    )
    .await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/investors/shortlist",
        Some(&investor),
        Some(json!({ "event_name": "Demo2024", "startup_email": "s@example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn events_accept_local_datetimes_without_offset() {
    let app = create_test_app();
    let organiser = register(&app, "o@example.com", "organiser").await;

    for (name, at) in [("Seconds", "2030-05-01T18:00:00"), ("Minutes", "2030-05-01T18:00")] {
        let (status, event) = send(
            &app,
            Method::POST,
            "/events",
            Some(&organiser),
            Some(json!({
                "name": name,
                "description": "",
                "image_url": "",
                "event_datetime": at,
                "terms_and_conditions": "",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "{at}: {event}");
        assert_eq!(event["event_datetime"], "2030-05-01T18:00:00Z");
    }
}

#[tokio::test]
async fn padded_event_names_resolve_in_paths() {
    let app = create_test_app();
    let organiser = register(&app, "o@example.com", "organiser").await;

    let (status, event) = create_event(&app, &organiser, "Padded ").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(event["name"], "Padded");

    let (status, _) = send(
        &app,
        Method::GET,
        "/events/Padded%20/enrollments",
        Some(&organiser),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        Method::GET,
        "/investors/requests/%20Padded",
        Some(&organiser),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn authentication_failures() {
    let app = create_test_app();

    let (status, body) = send(&app, Method::GET, "/auth/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error_code"], "missing_auth_header");

    let (status, _) = send(&app, Method::GET, "/auth/me", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let token = register(&app, "me@example.com", "investor").await;
    let (status, me) = send(&app, Method::GET, "/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["email"], "me@example.com");
    assert_eq!(me["role"], "investor");

    let (status, _) = send(
        &app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({ "email": "me@example.com", "password": "nope-nope" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        Method::POST,
        "/auth/register",
        None,
        Some(json!({
            "email": "weak@example.com",
            "password": "123",
            "role": "startup",
            "name": "Weak",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn health_and_banner() {
    let app = create_test_app();

    let (status, body) = send(&app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["checks"]["database"], "ok");

    let (status, body) = send(&app, Method::GET, "/", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["version"].is_string());
}
