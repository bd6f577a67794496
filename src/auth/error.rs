// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Failures while establishing who the caller is and what they may do.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::error::ApiError;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Authorization header is required")]
    MissingAuthHeader,

    #[error("Invalid authorization header format (expected 'Bearer <token>')")]
    InvalidAuthHeader,

    #[error("Session token is malformed")]
    MalformedToken,

    #[error("Session token signature is invalid")]
    InvalidSignature,

    #[error("Session has expired, please log in again")]
    TokenExpired,

    #[error("Session token was not issued by this service")]
    InvalidIssuer,

    /// Unknown email or wrong password; the two are indistinguishable.
    #[error("Incorrect email or password")]
    InvalidCredentials,

    #[error("Could not sign session token: {0}")]
    TokenSigning(String),

    /// Authenticated, but the role does not match the route.
    #[error("Insufficient permissions for this operation")]
    InsufficientPermissions,
}

impl AuthError {
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingAuthHeader => "missing_auth_header",
            AuthError::InvalidAuthHeader => "invalid_auth_header",
            AuthError::MalformedToken => "malformed_token",
            AuthError::InvalidSignature => "invalid_signature",
            AuthError::TokenExpired => "token_expired",
            AuthError::InvalidIssuer => "invalid_issuer",
            AuthError::InvalidCredentials => "invalid_credentials",
            AuthError::TokenSigning(_) => "internal_error",
            AuthError::InsufficientPermissions => "insufficient_permissions",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::InsufficientPermissions => StatusCode::FORBIDDEN,
            AuthError::TokenSigning(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::UNAUTHORIZED,
        }
    }
}

/// Extractor rejections render through [`ApiError`] so every failure shares
/// one body shape.
impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        ApiError::from(self).into_response()
    }
}
