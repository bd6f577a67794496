// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractors for authenticated users.
//!
//! Use the `Auth` extractor in handlers to require authentication, or one of
//! the role aliases to also require a role:
//!
//! ```rust,ignore
//! async fn my_handler(RequireRole(user): OrganiserOnly) -> impl IntoResponse {
//!     // user is an organiser
//! }
//! ```

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use super::{AuthError, AuthenticatedUser, Role};
use crate::state::AppState;

/// Extractor for authenticated users.
///
/// Validates the session token from the `Authorization: Bearer <token>`
/// header. A user already placed in the request extensions is used as-is.
pub struct Auth(pub AuthenticatedUser);

impl FromRequestParts<AppState> for Auth {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthenticatedUser>().cloned() {
            return Ok(Auth(user));
        }

        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or(AuthError::MissingAuthHeader)?
            .to_str()
            .map_err(|_| AuthError::InvalidAuthHeader)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(AuthError::InvalidAuthHeader)?;

        let user = state.sessions.verify(token).inspect_err(|e| {
            tracing::debug!(error_code = e.error_code(), "Rejected session token");
        })?;

        Ok(Auth(user))
    }
}

/// Extractor that requires the caller's role to be in `MASK`.
///
/// `MASK` is an OR of [`Role::bit`] values; prefer the aliases below.
pub struct RequireRole<const MASK: u8>(pub AuthenticatedUser);

impl<const MASK: u8> FromRequestParts<AppState> for RequireRole<MASK> {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Auth(user) = Auth::from_request_parts(parts, state).await?;

        if !user.role.is_in(MASK) {
            tracing::debug!(email = %user.email, role = %user.role, "Role not permitted");
            return Err(AuthError::InsufficientPermissions);
        }

        Ok(RequireRole(user))
    }
}

pub type OrganiserOnly = RequireRole<{ Role::Organiser.bit() }>;
pub type StartupOnly = RequireRole<{ Role::Startup.bit() }>;
pub type InvestorOnly = RequireRole<{ Role::Investor.bit() }>;
/// Startups and investors: the event browsers.
pub type ParticipantOnly = RequireRole<{ Role::Startup.bit() | Role::Investor.bit() }>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::UserRecord;
    use axum::http::Request;

    fn parts_with(header: Option<String>) -> Parts {
        let mut builder = Request::builder().uri("/test");
        if let Some(value) = header {
            builder = builder.header("Authorization", value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    fn token_for(state: &AppState, email: &str, role: Role) -> String {
        let user = UserRecord::new(email.to_string(), "Test".to_string(), role, "x".to_string());
        state.sessions.issue(&user).unwrap().token
    }

    #[tokio::test]
    async fn auth_extractor_requires_auth_header() {
        let state = AppState::for_tests();
        let mut parts = parts_with(None);

        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::MissingAuthHeader)));
    }

    #[tokio::test]
    async fn auth_extractor_rejects_non_bearer_scheme() {
        let state = AppState::for_tests();
        let mut parts = parts_with(Some("Basic dXNlcjpwYXNz".to_string()));

        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::InvalidAuthHeader)));
    }

    #[tokio::test]
    async fn auth_extractor_succeeds_with_issued_token() {
        let state = AppState::for_tests();
        let token = token_for(&state, "s@example.com", Role::Startup);
        let mut parts = parts_with(Some(format!("Bearer {token}")));

        let Auth(user) = Auth::from_request_parts(&mut parts, &state).await.unwrap();
        assert_eq!(user.email, "s@example.com");
        assert_eq!(user.role, Role::Startup);
    }

    #[tokio::test]
    async fn auth_extractor_rejects_tampered_token() {
        let state = AppState::for_tests();
        let token = token_for(&state, "s@example.com", Role::Startup);
        let mut parts = parts_with(Some(format!("Bearer {token}x")));

        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn auth_extractor_prefers_extensions() {
        let state = AppState::for_tests();
        let mut parts = parts_with(None);
        parts.extensions.insert(AuthenticatedUser {
            user_id: "uid".to_string(),
            email: "preset@example.com".to_string(),
            name: "Preset".to_string(),
            role: Role::Investor,
            expires_at: 0,
        });

        let Auth(user) = Auth::from_request_parts(&mut parts, &state).await.unwrap();
        assert_eq!(user.email, "preset@example.com");
    }

    #[tokio::test]
    async fn role_extractors_check_mask() {
        let state = AppState::for_tests();
        let startup = token_for(&state, "s@example.com", Role::Startup);

        let mut parts = parts_with(Some(format!("Bearer {startup}")));
        let result = OrganiserOnly::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::InsufficientPermissions)));

        let mut parts = parts_with(Some(format!("Bearer {startup}")));
        let result = InvestorOnly::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::InsufficientPermissions)));

        let mut parts = parts_with(Some(format!("Bearer {startup}")));
        assert!(StartupOnly::from_request_parts(&mut parts, &state).await.is_ok());

        let mut parts = parts_with(Some(format!("Bearer {startup}")));
        assert!(ParticipantOnly::from_request_parts(&mut parts, &state).await.is_ok());

        let organiser = token_for(&state, "o@example.com", Role::Organiser);
        let mut parts = parts_with(Some(format!("Bearer {organiser}")));
        let result = ParticipantOnly::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::InsufficientPermissions)));
    }
}
