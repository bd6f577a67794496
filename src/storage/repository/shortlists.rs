// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Shortlist ledger.
//!
//! Each investor keeps a private shortlist per event, stored under
//! `event_name\0investor_email\0startup_email`. The first shortlist recorded
//! for an enrollment also marks the enrollment itself as shortlisted.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use redb::ReadableTable;
use serde::{Deserialize, Serialize};

use super::super::database::{
    composite_key, decode, encode, prefix_range, ACCESS_REQUESTS, ENROLLMENTS, EVENTS, SHORTLISTS,
};
use super::super::{EventDatabase, StorageError, StorageResult};
use super::access::read_access_request;
use super::enrollments::{read_enrollment, EnrollmentRecord, EnrollmentStatus};
use super::events::{require_event, EventStatus};
use crate::auth::AuthenticatedUser;

/// Shortlist document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShortlistRecord {
    pub event_name: String,
    pub investor_email: String,
    pub startup_email: String,
    pub created_at: DateTime<Utc>,
}

/// Repository for investor shortlists.
pub struct ShortlistRepository<'a> {
    db: &'a EventDatabase,
}

impl<'a> ShortlistRepository<'a> {
    pub fn new(db: &'a EventDatabase) -> Self {
        Self { db }
    }

    /// Shortlist a startup's enrollment on behalf of an investor.
    ///
    /// Checks, in order: the event exists (`NotFound`), it is closed
    /// (`InvalidState`), the investor's access is approved
    /// (`PermissionDenied`), and the enrollment exists (`NotFound`).
    /// Shortlisting the same startup twice is a no-op.
    pub fn shortlist(
        &self,
        event_name: &str,
        investor: &AuthenticatedUser,
        startup_email: &str,
    ) -> StorageResult<EnrollmentRecord> {
        let shortlist_key = composite_key(&[event_name, &investor.email, startup_email]);
        let enrollment_key = composite_key(&[event_name, startup_email]);

        let write_txn = self.db.begin_write()?;
        let enrollment = {
            let events = write_txn.open_table(EVENTS)?;
            let event = require_event(&events, event_name)?;
            if event.status != EventStatus::Closed {
                return Err(StorageError::InvalidState(format!(
                    "Can only shortlist startups after the event is closed; {event_name} is {}",
                    event.status
                )));
            }

            let access = write_txn.open_table(ACCESS_REQUESTS)?;
            let approved = read_access_request(&access, event_name, &investor.email)?
                .is_some_and(|request| request.is_approved());
            if !approved {
                return Err(StorageError::PermissionDenied {
                    user_id: investor.email.clone(),
                    resource: format!("enrollments of event {event_name}"),
                });
            }

            let mut enrollments = write_txn.open_table(ENROLLMENTS)?;
            let mut enrollment = read_enrollment(&enrollments, event_name, startup_email)?
                .ok_or_else(|| {
                    StorageError::NotFound(format!("Enrollment of {startup_email} in {event_name}"))
                })?;

            let mut shortlists = write_txn.open_table(SHORTLISTS)?;
            if shortlists.get(shortlist_key.as_slice())?.is_none() {
                let record = ShortlistRecord {
                    event_name: event_name.to_string(),
                    investor_email: investor.email.clone(),
                    startup_email: startup_email.to_string(),
                    created_at: Utc::now(),
                };
                let json = encode(&record)?;
                shortlists.insert(shortlist_key.as_slice(), json.as_slice())?;
            }

            if !enrollment.is_shortlisted() {
                enrollment.status = EnrollmentStatus::Shortlisted;
                let json = encode(&enrollment)?;
                enrollments.insert(enrollment_key.as_slice(), json.as_slice())?;
            }
            enrollment
        };
        write_txn.commit()?;
        Ok(enrollment)
    }

    /// Startups an investor has shortlisted for an event.
    pub fn shortlisted_by(
        &self,
        event_name: &str,
        investor_email: &str,
    ) -> StorageResult<HashSet<String>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(SHORTLISTS)?;

        let (start, end) = prefix_range(&[event_name, investor_email]);
        let mut startups = HashSet::new();
        for entry in table.range(start.as_slice()..end.as_slice())? {
            let (_, value) = entry?;
            let record: ShortlistRecord = decode(value.value())?;
            startups.insert(record.startup_email);
        }
        Ok(startups)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;
    use crate::storage::repository::enrollments::tests::test_enrollment;
    use crate::storage::repository::events::tests::{organiser, test_event};
    use crate::storage::{AccessRepository, AccessRequestRecord, EnrollmentRepository, EventRepository};

    fn investor(email: &str) -> AuthenticatedUser {
        AuthenticatedUser {
            user_id: "uid-investor".to_string(),
            email: email.to_string(),
            name: "Ian".to_string(),
            role: Role::Investor,
            expires_at: 0,
        }
    }

    /// Event with one enrollment and one approved investor, still upcoming.
    fn setup() -> EventDatabase {
        let db = EventDatabase::in_memory().unwrap();
        EventRepository::new(&db)
            .create(&test_event("Demo2024", "o@example.com"))
            .unwrap();
        EnrollmentRepository::new(&db)
            .create(&test_enrollment("Demo2024", "s@example.com"))
            .unwrap();

        let access = AccessRepository::new(&db);
        access
            .create(&AccessRequestRecord::pending(
                "Demo2024".to_string(),
                "i@example.com".to_string(),
            ))
            .unwrap();
        access
            .decide("Demo2024", &organiser("o@example.com"), "i@example.com", true)
            .unwrap();
        db
    }

    fn close(db: &EventDatabase) {
        EventRepository::new(db)
            .update_status("Demo2024", &organiser("o@example.com"), EventStatus::Closed)
            .unwrap();
    }

    #[test]
    fn shortlist_requires_closed_event() {
        let db = setup();
        let repo = ShortlistRepository::new(&db);

        let result = repo.shortlist("Demo2024", &investor("i@example.com"), "s@example.com");
        assert!(matches!(result, Err(StorageError::InvalidState(_))));

        let enrollment = EnrollmentRepository::new(&db).get("Demo2024", "s@example.com").unwrap();
        assert!(!enrollment.is_shortlisted());
    }

    #[test]
    fn shortlist_requires_approved_access() {
        let db = setup();
        close(&db);
        let repo = ShortlistRepository::new(&db);

        let result = repo.shortlist("Demo2024", &investor("stranger@example.com"), "s@example.com");
        assert!(matches!(result, Err(StorageError::PermissionDenied { .. })));
    }

    #[test]
    fn rejected_investor_cannot_shortlist() {
        let db = setup();
        close(&db);
        AccessRepository::new(&db)
            .decide("Demo2024", &organiser("o@example.com"), "i@example.com", false)
            .unwrap();

        let result = ShortlistRepository::new(&db).shortlist(
            "Demo2024",
            &investor("i@example.com"),
            "s@example.com",
        );
        assert!(matches!(result, Err(StorageError::PermissionDenied { .. })));
    }

    #[test]
    fn shortlist_unknown_enrollment_is_not_found() {
        let db = setup();
        close(&db);
        let repo = ShortlistRepository::new(&db);

        let result = repo.shortlist("Demo2024", &investor("i@example.com"), "ghost@example.com");
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[test]
    fn shortlist_marks_enrollment_and_is_idempotent() {
        let db = setup();
        close(&db);
        let repo = ShortlistRepository::new(&db);

        let updated = repo
            .shortlist("Demo2024", &investor("i@example.com"), "s@example.com")
            .unwrap();
        assert!(updated.is_shortlisted());

        repo.shortlist("Demo2024", &investor("i@example.com"), "s@example.com")
            .unwrap();

        let stored = EnrollmentRepository::new(&db).get("Demo2024", "s@example.com").unwrap();
        assert_eq!(stored.status, EnrollmentStatus::Shortlisted);

        let mine = repo.shortlisted_by("Demo2024", "i@example.com").unwrap();
        assert_eq!(mine.len(), 1);
        assert!(mine.contains("s@example.com"));
        assert!(repo.shortlisted_by("Demo2024", "other@example.com").unwrap().is_empty());
    }
}
