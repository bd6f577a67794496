// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Email/password accounts with stateless session tokens.
//!
//! ## Auth Flow
//!
//! 1. Client registers or logs in with email and password
//! 2. Server verifies the Argon2 hash and returns an HS256 JWT
//!    (`sub` = email, `role`, `uid`, `name`, 30 day expiry)
//! 3. Client sends `Authorization: Bearer <token>` on every call
//! 4. Extractors verify the token and gate handlers by role
//!
//! ## Security
//!
//! - Passwords are stored only as Argon2id PHC strings
//! - Tokens are checked for signature, expiry and issuer
//! - Clock skew tolerance is 60 seconds

pub mod claims;
pub mod error;
pub mod extractor;
pub mod password;
pub mod roles;
pub mod session;

pub use claims::{AuthenticatedUser, SessionClaims};
pub use error::AuthError;
pub use extractor::{
    Auth, InvestorOnly, OrganiserOnly, ParticipantOnly, RequireRole, StartupOnly,
};
pub use password::{hash_password, verify_login, PasswordError};
pub use roles::Role;
pub use session::{IssuedToken, SessionIssuer, DEFAULT_TOKEN_TTL_DAYS};
