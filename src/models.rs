// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! This module defines the request and response data structures used by
//! the REST API. All types derive `ToSchema` for OpenAPI documentation.
//!
//! ## Validation
//!
//! Request bodies implement [`Validate`], which normalises the input (trims
//! text, lower-cases emails) and rejects values the storage layer must never
//! see. Names and emails end up inside composite database keys, so control
//! characters are refused everywhere.
//!
//! ## Model Categories
//!
//! - **Accounts**: registration, login, session tokens
//! - **Events**: creation and status changes
//! - **Enrollments**: startup pitches for an event
//! - **Investor access**: access requests, decisions and shortlists

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

use crate::auth::Role;
use crate::storage::{
    AccessRequestRecord, AccessStatus, EnrollmentRecord, EnrollmentStatus, EventStatus, UserRecord,
};

/// Minimum accepted password length.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Maximum accepted email length.
pub const MAX_EMAIL_LEN: usize = 254;

// =============================================================================
// Validation
// =============================================================================

/// A request field that failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Normalise and check a request body.
pub trait Validate: Sized {
    fn validate(self) -> Result<Self, ValidationError>;
}

/// Trim, reject empty values and control characters.
fn required_text(field: &'static str, value: String) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::new(field, "must not be empty"));
    }
    if trimmed.chars().any(char::is_control) {
        return Err(ValidationError::new(field, "must not contain control characters"));
    }
    Ok(trimmed.to_string())
}

/// Event name captured from a URL path, normalised like body names.
pub fn event_name_from_path(raw: String) -> Result<String, ValidationError> {
    required_text("event_name", raw)
}

/// Free text may be empty and span lines.
fn free_text(value: String) -> String {
    value.trim().to_string()
}

/// Offset-less formats accepted for event date-times, read as UTC.
const NAIVE_DATETIME_FORMATS: [&str; 3] =
    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Parse an RFC 3339 timestamp, or a local date-time without offset as UTC.
pub fn parse_event_datetime(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|naive| naive.and_utc())
}

fn deserialize_event_datetime<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_event_datetime(&raw).ok_or_else(|| {
        serde::de::Error::custom(format!(
            "invalid date-time {raw:?}, expected RFC 3339 or YYYY-MM-DDTHH:MM[:SS]"
        ))
    })
}

/// Lower-case an email address and check its basic shape.
pub fn normalize_email(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let email = value.trim().to_lowercase();
    if email.len() > MAX_EMAIL_LEN {
        return Err(ValidationError::new(field, "is too long"));
    }
    if email.chars().any(|c| c.is_control() || c.is_whitespace()) {
        return Err(ValidationError::new(field, "is not a valid email address"));
    }

    let mut parts = email.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(ValidationError::new(field, "is not a valid email address"));
    };
    let domain_ok = domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !domain.contains("..");
    if local.is_empty() || !domain_ok {
        return Err(ValidationError::new(field, "is not a valid email address"));
    }
    Ok(email)
}

// =============================================================================
// Account Models
// =============================================================================

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub email: String,
    /// At least 6 characters
    pub password: String,
    pub role: Role,
    pub name: String,
}

impl Validate for RegisterRequest {
    fn validate(self) -> Result<Self, ValidationError> {
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ValidationError::new(
                "password",
                format!("must be at least {MIN_PASSWORD_LEN} characters"),
            ));
        }
        Ok(Self {
            email: normalize_email("email", &self.email)?,
            password: self.password,
            role: self.role,
            name: required_text("name", self.name)?,
        })
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl Validate for LoginRequest {
    fn validate(self) -> Result<Self, ValidationError> {
        Ok(Self {
            email: normalize_email("email", &self.email)?,
            password: self.password,
        })
    }
}

/// Public view of an account.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct UserProfile {
    pub email: String,
    pub role: Role,
    pub name: String,
}

impl From<&UserRecord> for UserProfile {
    fn from(user: &UserRecord) -> Self {
        Self {
            email: user.email.clone(),
            role: user.role,
            name: user.name.clone(),
        }
    }
}

/// Session token returned by register and login.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub access_token: String,
    /// Always `bearer`
    pub token_type: String,
    pub user: UserProfile,
}

// =============================================================================
// Event Models
// =============================================================================

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateEventRequest {
    /// Globally unique event name
    pub name: String,
    pub description: String,
    pub image_url: String,
    /// RFC 3339 timestamp; values without an offset are taken as UTC
    #[serde(deserialize_with = "deserialize_event_datetime")]
    pub event_datetime: DateTime<Utc>,
    pub terms_and_conditions: String,
}

impl Validate for CreateEventRequest {
    fn validate(self) -> Result<Self, ValidationError> {
        Ok(Self {
            name: required_text("name", self.name)?,
            description: free_text(self.description),
            image_url: free_text(self.image_url),
            event_datetime: self.event_datetime,
            terms_and_conditions: free_text(self.terms_and_conditions),
        })
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateEventStatusRequest {
    pub event_name: String,
    pub status: EventStatus,
}

impl Validate for UpdateEventStatusRequest {
    fn validate(self) -> Result<Self, ValidationError> {
        Ok(Self {
            event_name: required_text("event_name", self.event_name)?,
            status: self.status,
        })
    }
}

// =============================================================================
// Enrollment Models
// =============================================================================

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateEnrollmentRequest {
    pub event_name: String,
    pub idea_name: String,
    pub idea_description: String,
    pub team_details: String,
}

impl Validate for CreateEnrollmentRequest {
    fn validate(self) -> Result<Self, ValidationError> {
        Ok(Self {
            event_name: required_text("event_name", self.event_name)?,
            idea_name: required_text("idea_name", self.idea_name)?,
            idea_description: free_text(self.idea_description),
            team_details: free_text(self.team_details),
        })
    }
}

/// An enrollment as returned by the API.
///
/// Organisers and startups see the enrollment's own status. An investor sees
/// only their own shortlist decision in both `status` and `shortlisted`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct EnrollmentResponse {
    pub event_name: String,
    pub startup_email: String,
    pub idea_name: String,
    pub idea_description: String,
    pub team_details: String,
    pub status: EnrollmentStatus,
    pub shortlisted: bool,
    pub created_at: DateTime<Utc>,
}

impl EnrollmentResponse {
    /// View for an investor, limited to their own decision.
    pub fn for_investor(record: EnrollmentRecord, shortlisted_by_caller: bool) -> Self {
        let mut response = Self::from(record);
        response.shortlisted = shortlisted_by_caller;
        response.status = if shortlisted_by_caller {
            EnrollmentStatus::Shortlisted
        } else {
            EnrollmentStatus::Submitted
        };
        response
    }
}

impl From<EnrollmentRecord> for EnrollmentResponse {
    fn from(record: EnrollmentRecord) -> Self {
        Self {
            shortlisted: record.is_shortlisted(),
            event_name: record.event_name,
            startup_email: record.startup_email,
            idea_name: record.idea_name,
            idea_description: record.idea_description,
            team_details: record.team_details,
            status: record.status,
            created_at: record.created_at,
        }
    }
}

// =============================================================================
// Investor Access Models
// =============================================================================

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RequestAccessRequest {
    pub event_name: String,
}

impl Validate for RequestAccessRequest {
    fn validate(self) -> Result<Self, ValidationError> {
        Ok(Self {
            event_name: required_text("event_name", self.event_name)?,
        })
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ApproveAccessRequest {
    pub investor_email: String,
    pub event_name: String,
    /// `true` approves, `false` rejects
    pub approve: bool,
}

impl Validate for ApproveAccessRequest {
    fn validate(self) -> Result<Self, ValidationError> {
        Ok(Self {
            investor_email: normalize_email("investor_email", &self.investor_email)?,
            event_name: required_text("event_name", self.event_name)?,
            approve: self.approve,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct AccessRequestResponse {
    pub event_name: String,
    pub investor_email: String,
    pub status: AccessStatus,
    pub approved: bool,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decided_at: Option<DateTime<Utc>>,
}

impl From<AccessRequestRecord> for AccessRequestResponse {
    fn from(record: AccessRequestRecord) -> Self {
        Self {
            approved: record.is_approved(),
            event_name: record.event_name,
            investor_email: record.investor_email,
            status: record.status,
            created_at: record.created_at,
            decided_at: record.decided_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ShortlistRequest {
    pub event_name: String,
    pub startup_email: String,
}

impl Validate for ShortlistRequest {
    fn validate(self) -> Result<Self, ValidationError> {
        Ok(Self {
            event_name: required_text("event_name", self.event_name)?,
            startup_email: normalize_email("startup_email", &self.startup_email)?,
        })
    }
}
