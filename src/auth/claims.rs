// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session token claims and authenticated user representation.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::roles::Role;

/// Claims carried in a session token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionClaims {
    /// Subject: the user's email, which is their identity everywhere else
    pub sub: String,
    /// User UUID
    pub uid: String,
    pub role: Role,
    pub name: String,
    /// Issued at (Unix seconds)
    pub iat: i64,
    /// Expiration (Unix seconds)
    pub exp: i64,
    pub iss: String,
}

/// Authenticated user information extracted from a session token.
///
/// This is the primary type used throughout the application to represent
/// the caller of a request.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedUser {
    /// User UUID (`uid` claim)
    pub user_id: String,

    /// Login email (`sub` claim)
    pub email: String,

    /// Display name
    pub name: String,

    pub role: Role,

    /// Token expiration (Unix timestamp, not serialized)
    #[serde(skip)]
    pub expires_at: i64,
}

impl AuthenticatedUser {
    pub fn from_claims(claims: SessionClaims) -> Self {
        Self {
            user_id: claims.uid,
            email: claims.sub,
            name: claims.name,
            role: claims.role,
            expires_at: claims.exp,
        }
    }

    /// Check if the user has the required role.
    pub fn has_role(&self, required: Role) -> bool {
        self.role == required
    }
}
