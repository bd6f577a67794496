// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, http::StatusCode, Json};

use super::extract::ValidatedJson;
use crate::{
    auth::{hash_password, verify_login, Auth, AuthError},
    error::{ApiError, ErrorBody},
    models::{LoginRequest, RegisterRequest, TokenResponse, UserProfile},
    state::AppState,
    storage::{StorageError, UserRecord, UserRepository},
};

fn token_response(state: &AppState, user: &UserRecord) -> Result<TokenResponse, ApiError> {
    let issued = state.sessions.issue(user)?;
    Ok(TokenResponse {
        access_token: issued.token,
        token_type: "bearer".to_string(),
        user: UserProfile::from(user),
    })
}

/// Create an account and sign the new user in.
#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterRequest,
    tag = "Auth",
    responses(
        (status = 201, description = "Account created", body = TokenResponse),
        (status = 409, description = "Email already registered", body = ErrorBody),
        (status = 422, description = "Invalid input", body = ErrorBody)
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<TokenResponse>), ApiError> {
    let password_hash = hash_password(&request.password)?;
    let user = UserRecord::new(request.email, request.name, request.role, password_hash);

    UserRepository::new(&state.db)
        .create(&user)
        .map_err(|e| match e {
            StorageError::AlreadyExists(_) => ApiError::conflict("Email already registered"),
            other => ApiError::from(other),
        })?;

    tracing::info!(email = %user.email, role = %user.role, "User registered");
    Ok((StatusCode::CREATED, Json(token_response(&state, &user)?)))
}

/// Exchange email and password for a session token.
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    tag = "Auth",
    responses(
        (status = 200, description = "Signed in", body = TokenResponse),
        (status = 401, description = "Incorrect email or password", body = ErrorBody)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let user = UserRepository::new(&state.db).find_by_email(&request.email)?;

    let stored = user.as_ref().map(|u| u.password_hash.as_str());
    let verified = verify_login(&request.password, stored);

    let Some(user) = user.filter(|_| verified) else {
        tracing::warn!(email = %request.email, "Rejected login");
        return Err(AuthError::InvalidCredentials.into());
    };

    Ok(Json(token_response(&state, &user)?))
}

/// Identity of the caller.
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "Auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, body = UserProfile),
        (status = 401, body = ErrorBody)
    )
)]
pub async fn me(Auth(user): Auth) -> Json<UserProfile> {
    Json(UserProfile {
        email: user.email,
        role: user.role,
        name: user.name,
    })
}
