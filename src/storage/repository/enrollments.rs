// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Enrollment ledger.
//!
//! One enrollment per (event, startup), stored under `event_name\0startup_email`
//! so the primary key enforces uniqueness. A secondary index keyed by
//! `startup_email\0event_name` serves the startup's own listing.

use chrono::{DateTime, Utc};
use redb::ReadableTable;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::super::database::{
    composite_key, decode, encode, prefix_range, ENROLLMENTS, EVENTS, STARTUP_ENROLLMENT_INDEX,
};
use super::super::{EventDatabase, StorageError, StorageResult};
use super::events::{require_event, EventStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum EnrollmentStatus {
    Submitted,
    /// At least one investor shortlisted this startup
    Shortlisted,
}

/// Enrollment document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EnrollmentRecord {
    pub event_name: String,
    pub startup_email: String,
    pub idea_name: String,
    pub idea_description: String,
    pub team_details: String,
    pub status: EnrollmentStatus,
    pub created_at: DateTime<Utc>,
}

impl EnrollmentRecord {
    pub fn new(
        event_name: String,
        startup_email: String,
        idea_name: String,
        idea_description: String,
        team_details: String,
    ) -> Self {
        Self {
            event_name,
            startup_email,
            idea_name,
            idea_description,
            team_details,
            status: EnrollmentStatus::Submitted,
            created_at: Utc::now(),
        }
    }

    pub fn is_shortlisted(&self) -> bool {
        self.status == EnrollmentStatus::Shortlisted
    }
}

/// Read an enrollment inside an already-open transaction.
pub(crate) fn read_enrollment(
    table: &impl ReadableTable<&'static [u8], &'static [u8]>,
    event_name: &str,
    startup_email: &str,
) -> StorageResult<Option<EnrollmentRecord>> {
    let key = composite_key(&[event_name, startup_email]);
    let enrollment = match table.get(key.as_slice())? {
        Some(value) => Some(decode(value.value())?),
        None => None,
    };
    Ok(enrollment)
}

fn newest_first(enrollments: &mut [EnrollmentRecord]) {
    enrollments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

/// Repository for enrollment operations.
pub struct EnrollmentRepository<'a> {
    db: &'a EventDatabase,
}

impl<'a> EnrollmentRepository<'a> {
    pub fn new(db: &'a EventDatabase) -> Self {
        Self { db }
    }

    /// Get the enrollment of a startup in an event.
    pub fn get(&self, event_name: &str, startup_email: &str) -> StorageResult<EnrollmentRecord> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ENROLLMENTS)?;
        read_enrollment(&table, event_name, startup_email)?.ok_or_else(|| {
            StorageError::NotFound(format!("Enrollment of {startup_email} in {event_name}"))
        })
    }

    /// Insert a new enrollment.
    ///
    /// The event must exist (`NotFound`) and still be upcoming
    /// (`InvalidState`); a second enrollment for the same pair fails with
    /// `AlreadyExists`.
    pub fn create(&self, enrollment: &EnrollmentRecord) -> StorageResult<()> {
        let json = encode(enrollment)?;
        let key = composite_key(&[&enrollment.event_name, &enrollment.startup_email]);
        let index_key = composite_key(&[&enrollment.startup_email, &enrollment.event_name]);

        let write_txn = self.db.begin_write()?;
        {
            let events = write_txn.open_table(EVENTS)?;
            let event = require_event(&events, &enrollment.event_name)?;
            if event.status != EventStatus::Upcoming {
                return Err(StorageError::InvalidState(format!(
                    "Can only enroll in upcoming events; {} is {}",
                    event.name, event.status
                )));
            }

            let mut table = write_txn.open_table(ENROLLMENTS)?;
            if table.get(key.as_slice())?.is_some() {
                return Err(StorageError::AlreadyExists(format!(
                    "Enrollment of {} in {}",
                    enrollment.startup_email, enrollment.event_name
                )));
            }
            table.insert(key.as_slice(), json.as_slice())?;

            let mut index = write_txn.open_table(STARTUP_ENROLLMENT_INDEX)?;
            index.insert(index_key.as_slice(), enrollment.event_name.as_str())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// All enrollments for an event, newest first.
    pub fn list_by_event(&self, event_name: &str) -> StorageResult<Vec<EnrollmentRecord>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ENROLLMENTS)?;

        let (start, end) = prefix_range(&[event_name]);
        let mut enrollments = Vec::new();
        for entry in table.range(start.as_slice()..end.as_slice())? {
            let (_, value) = entry?;
            enrollments.push(decode::<EnrollmentRecord>(value.value())?);
        }

        newest_first(&mut enrollments);
        Ok(enrollments)
    }

    /// All enrollments submitted by a startup, newest first.
    pub fn list_by_startup(&self, startup_email: &str) -> StorageResult<Vec<EnrollmentRecord>> {
        let read_txn = self.db.begin_read()?;
        let index = read_txn.open_table(STARTUP_ENROLLMENT_INDEX)?;
        let table = read_txn.open_table(ENROLLMENTS)?;

        let (start, end) = prefix_range(&[startup_email]);
        let mut enrollments = Vec::new();
        for entry in index.range(start.as_slice()..end.as_slice())? {
            let (_, event_name) = entry?;
            if let Some(enrollment) = read_enrollment(&table, event_name.value(), startup_email)? {
                enrollments.push(enrollment);
            }
        }

        newest_first(&mut enrollments);
        Ok(enrollments)
    }
}
