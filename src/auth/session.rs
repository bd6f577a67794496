// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session token issuance and verification (HS256 JWT).

use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};

use super::{AuthError, AuthenticatedUser, SessionClaims};
use crate::storage::UserRecord;

/// Clock skew tolerance (60 seconds).
const CLOCK_SKEW_LEEWAY: u64 = 60;

/// Default session lifetime.
pub const DEFAULT_TOKEN_TTL_DAYS: i64 = 30;

/// A freshly signed session token.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    /// Expiration (Unix seconds)
    pub expires_at: i64,
}

/// Signs and verifies session tokens with a shared secret.
pub struct SessionIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    ttl: Duration,
}

impl SessionIssuer {
    pub fn new(secret: &[u8], issuer: impl Into<String>, ttl_days: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            issuer: issuer.into(),
            ttl: Duration::days(ttl_days),
        }
    }

    /// Sign a token for `user`, valid for the configured lifetime.
    pub fn issue(&self, user: &UserRecord) -> Result<IssuedToken, AuthError> {
        let now = Utc::now();
        let expires_at = (now + self.ttl).timestamp();
        let claims = SessionClaims {
            sub: user.email.clone(),
            uid: user.id.clone(),
            role: user.role,
            name: user.name.clone(),
            iat: now.timestamp(),
            exp: expires_at,
            iss: self.issuer.clone(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::TokenSigning(e.to_string()))?;

        Ok(IssuedToken { token, expires_at })
    }

    /// Verify signature, expiry and issuer, then extract the caller.
    pub fn verify(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = CLOCK_SKEW_LEEWAY;
        validation.set_issuer(&[&self.issuer]);
        validation.set_required_spec_claims(&["exp", "sub", "iss"]);
        validation.validate_aud = false;

        let token_data = decode::<SessionClaims>(token, &self.decoding_key, &validation)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                ErrorKind::InvalidSignature => AuthError::InvalidSignature,
                ErrorKind::InvalidIssuer => AuthError::InvalidIssuer,
                _ => AuthError::MalformedToken,
            })?;

        Ok(AuthenticatedUser::from_claims(token_data.claims))
    }
}
