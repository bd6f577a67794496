// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Access control ledger.
//!
//! Investors ask an event's organiser for permission to see its enrollments.
//! One request per (event, investor), keyed by `event_name\0investor_email`.

use chrono::{DateTime, Utc};
use redb::ReadableTable;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::super::database::{composite_key, decode, encode, prefix_range, ACCESS_REQUESTS, EVENTS};
use super::super::{EventDatabase, OwnershipEnforcer, StorageError, StorageResult};
use super::events::require_event;
use crate::auth::AuthenticatedUser;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AccessStatus {
    /// Awaiting the organiser's decision
    Pending,
    Approved,
    Rejected,
}

impl AccessStatus {
    pub fn from_decision(approve: bool) -> Self {
        if approve {
            AccessStatus::Approved
        } else {
            AccessStatus::Rejected
        }
    }
}

/// Access request document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccessRequestRecord {
    pub event_name: String,
    pub investor_email: String,
    pub status: AccessStatus,
    pub created_at: DateTime<Utc>,
    /// When the organiser last approved or rejected the request
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decided_at: Option<DateTime<Utc>>,
}

impl AccessRequestRecord {
    pub fn pending(event_name: String, investor_email: String) -> Self {
        Self {
            event_name,
            investor_email,
            status: AccessStatus::Pending,
            created_at: Utc::now(),
            decided_at: None,
        }
    }

    pub fn is_approved(&self) -> bool {
        self.status == AccessStatus::Approved
    }
}

/// Read an access request inside an already-open transaction.
pub(crate) fn read_access_request(
    table: &impl ReadableTable<&'static [u8], &'static [u8]>,
    event_name: &str,
    investor_email: &str,
) -> StorageResult<Option<AccessRequestRecord>> {
    let key = composite_key(&[event_name, investor_email]);
    let request = match table.get(key.as_slice())? {
        Some(value) => Some(decode(value.value())?),
        None => None,
    };
    Ok(request)
}

/// Repository for investor access requests.
pub struct AccessRepository<'a> {
    db: &'a EventDatabase,
}

impl<'a> AccessRepository<'a> {
    pub fn new(db: &'a EventDatabase) -> Self {
        Self { db }
    }

    /// Look up an investor's request for an event.
    pub fn find(
        &self,
        event_name: &str,
        investor_email: &str,
    ) -> StorageResult<Option<AccessRequestRecord>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ACCESS_REQUESTS)?;
        read_access_request(&table, event_name, investor_email)
    }

    /// Whether the investor holds an approved request for the event.
    pub fn is_approved(&self, event_name: &str, investor_email: &str) -> StorageResult<bool> {
        Ok(self
            .find(event_name, investor_email)?
            .is_some_and(|request| request.is_approved()))
    }

    /// Insert a new pending request.
    ///
    /// The event must exist (`NotFound`); a repeated request fails with
    /// `AlreadyExists`.
    pub fn create(&self, request: &AccessRequestRecord) -> StorageResult<()> {
        let json = encode(request)?;
        let key = composite_key(&[&request.event_name, &request.investor_email]);

        let write_txn = self.db.begin_write()?;
        {
            let events = write_txn.open_table(EVENTS)?;
            require_event(&events, &request.event_name)?;

            let mut table = write_txn.open_table(ACCESS_REQUESTS)?;
            if table.get(key.as_slice())?.is_some() {
                return Err(StorageError::AlreadyExists(format!(
                    "Access request of {} for {}",
                    request.investor_email, request.event_name
                )));
            }
            table.insert(key.as_slice(), json.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// All requests for an event, newest first.
    pub fn list_by_event(&self, event_name: &str) -> StorageResult<Vec<AccessRequestRecord>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ACCESS_REQUESTS)?;

        let (start, end) = prefix_range(&[event_name]);
        let mut requests = Vec::new();
        for entry in table.range(start.as_slice()..end.as_slice())? {
            let (_, value) = entry?;
            requests.push(decode::<AccessRequestRecord>(value.value())?);
        }

        requests.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(requests)
    }

    /// Approve or reject a request on behalf of the event's organiser.
    ///
    /// A decision can be revised; the latest one wins.
    pub fn decide(
        &self,
        event_name: &str,
        organiser: &AuthenticatedUser,
        investor_email: &str,
        approve: bool,
    ) -> StorageResult<AccessRequestRecord> {
        let key = composite_key(&[event_name, investor_email]);

        let write_txn = self.db.begin_write()?;
        let request = {
            let events = write_txn.open_table(EVENTS)?;
            require_event(&events, event_name)?.verify_ownership(organiser)?;

            let mut table = write_txn.open_table(ACCESS_REQUESTS)?;
            let mut request = read_access_request(&table, event_name, investor_email)?
                .ok_or_else(|| {
                    StorageError::NotFound(format!(
                        "Access request of {investor_email} for {event_name}"
                    ))
                })?;

            request.status = AccessStatus::from_decision(approve);
            request.decided_at = Some(Utc::now());
            let json = encode(&request)?;
            table.insert(key.as_slice(), json.as_slice())?;
            request
        };
        write_txn.commit()?;
        Ok(request)
    }
}
