// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Event catalog.
//!
//! Events are keyed by their globally unique name. A secondary index keyed by
//! `organiser_email\0event_name` serves the organiser's own listing.

use chrono::{DateTime, Utc};
use redb::ReadableTable;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::super::database::{composite_key, decode, encode, prefix_range, EVENTS, ORGANISER_EVENT_INDEX};
use super::super::{EventDatabase, OwnedResource, OwnershipEnforcer, StorageError, StorageResult};
use crate::auth::AuthenticatedUser;

/// Event lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    /// Open for enrollments
    Upcoming,
    /// Pitching is over; investors may shortlist
    Closed,
}

impl EventStatus {
    /// Status only ever moves forward: `upcoming → closed`.
    pub fn can_transition_to(self, next: EventStatus) -> bool {
        !matches!((self, next), (EventStatus::Closed, EventStatus::Upcoming))
    }
}

impl std::fmt::Display for EventStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventStatus::Upcoming => write!(f, "upcoming"),
            EventStatus::Closed => write!(f, "closed"),
        }
    }
}

/// Event document.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct EventRecord {
    /// Globally unique event name
    pub name: String,
    pub description: String,
    pub image_url: String,
    /// When the pitching event takes place
    pub event_datetime: DateTime<Utc>,
    pub terms_and_conditions: String,
    pub status: EventStatus,
    /// Organiser who created (and owns) the event
    pub organiser_email: String,
    pub created_at: DateTime<Utc>,
}

impl OwnedResource for EventRecord {
    fn owner_email(&self) -> &str {
        &self.organiser_email
    }

    fn resource_label(&self) -> String {
        format!("event {}", self.name)
    }
}

/// Read an event inside an already-open transaction.
pub(crate) fn read_event(
    table: &impl ReadableTable<&'static str, &'static [u8]>,
    name: &str,
) -> StorageResult<Option<EventRecord>> {
    let event = match table.get(name)? {
        Some(value) => Some(decode(value.value())?),
        None => None,
    };
    Ok(event)
}

/// Like [`read_event`], failing with `NotFound` when the event is absent.
pub(crate) fn require_event(
    table: &impl ReadableTable<&'static str, &'static [u8]>,
    name: &str,
) -> StorageResult<EventRecord> {
    read_event(table, name)?.ok_or_else(|| StorageError::NotFound(format!("Event {name}")))
}

fn sort_by_schedule(events: &mut [EventRecord]) {
    events.sort_by(|a, b| {
        a.event_datetime
            .cmp(&b.event_datetime)
            .then_with(|| a.name.cmp(&b.name))
    });
}

/// Repository for event operations.
pub struct EventRepository<'a> {
    db: &'a EventDatabase,
}

impl<'a> EventRepository<'a> {
    pub fn new(db: &'a EventDatabase) -> Self {
        Self { db }
    }

    /// Get an event by name.
    pub fn get(&self, name: &str) -> StorageResult<EventRecord> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(EVENTS)?;
        require_event(&table, name)
    }

    /// Insert a new event.
    ///
    /// Fails with `AlreadyExists` when the name is taken.
    pub fn create(&self, event: &EventRecord) -> StorageResult<()> {
        let json = encode(event)?;
        let index_key = composite_key(&[&event.organiser_email, &event.name]);

        let write_txn = self.db.begin_write()?;
        {
            let mut events = write_txn.open_table(EVENTS)?;
            if events.get(event.name.as_str())?.is_some() {
                return Err(StorageError::AlreadyExists(format!("Event {}", event.name)));
            }
            events.insert(event.name.as_str(), json.as_slice())?;

            let mut index = write_txn.open_table(ORGANISER_EVENT_INDEX)?;
            index.insert(index_key.as_slice(), event.name.as_str())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// All events, earliest first.
    pub fn list_all(&self) -> StorageResult<Vec<EventRecord>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(EVENTS)?;

        let mut events = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            events.push(decode::<EventRecord>(value.value())?);
        }

        sort_by_schedule(&mut events);
        Ok(events)
    }

    /// Events owned by an organiser, earliest first.
    pub fn list_by_organiser(&self, organiser_email: &str) -> StorageResult<Vec<EventRecord>> {
        let read_txn = self.db.begin_read()?;
        let index = read_txn.open_table(ORGANISER_EVENT_INDEX)?;
        let table = read_txn.open_table(EVENTS)?;

        let (start, end) = prefix_range(&[organiser_email]);
        let mut events = Vec::new();
        for entry in index.range(start.as_slice()..end.as_slice())? {
            let (_, name) = entry?;
            if let Some(event) = read_event(&table, name.value())? {
                events.push(event);
            }
        }

        sort_by_schedule(&mut events);
        Ok(events)
    }

    /// Change an event's status on behalf of its organiser.
    ///
    /// Fails with `PermissionDenied` if `organiser` does not own the event and
    /// with `InvalidState` when asked to reopen a closed event. Setting the
    /// current status again is a no-op.
    pub fn update_status(
        &self,
        name: &str,
        organiser: &AuthenticatedUser,
        status: EventStatus,
    ) -> StorageResult<EventRecord> {
        let write_txn = self.db.begin_write()?;
        let event = {
            let mut table = write_txn.open_table(EVENTS)?;
            let mut event = require_event(&table, name)?;
            event.verify_ownership(organiser)?;

            if !event.status.can_transition_to(status) {
                return Err(StorageError::InvalidState(format!(
                    "Event {name} is {} and cannot become {status}",
                    event.status
                )));
            }

            event.status = status;
            let json = encode(&event)?;
            table.insert(name, json.as_slice())?;
            event
        };
        write_txn.commit()?;
        Ok(event)
    }
}
