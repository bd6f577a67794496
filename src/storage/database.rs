// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Embedded document database backed by redb (pure Rust, ACID).
//!
//! ## Table Layout
//!
//! - `users`: email → serialized UserRecord
//! - `events`: event name → serialized EventRecord
//! - `organiser_event_index`: `organiser_email\0event_name` → event name
//! - `enrollments`: `event_name\0startup_email` → serialized EnrollmentRecord
//! - `startup_enrollment_index`: `startup_email\0event_name` → event name
//! - `access_requests`: `event_name\0investor_email` → serialized AccessRequestRecord
//! - `shortlists`: `event_name\0investor_email\0startup_email` → serialized ShortlistRecord
//!
//! Primary keys double as unique indexes. Every check-then-write happens in a
//! single write transaction, and redb runs at most one writer at a time.

use std::path::Path;

use redb::{
    backends::InMemoryBackend, Database, ReadTransaction, ReadableDatabase, TableDefinition,
    WriteTransaction,
};
use serde::{de::DeserializeOwned, Serialize};

// =============================================================================
// Table Definitions
// =============================================================================

pub(crate) const USERS: TableDefinition<&str, &[u8]> = TableDefinition::new("users");

pub(crate) const EVENTS: TableDefinition<&str, &[u8]> = TableDefinition::new("events");

pub(crate) const ORGANISER_EVENT_INDEX: TableDefinition<&[u8], &str> =
    TableDefinition::new("organiser_event_index");

pub(crate) const ENROLLMENTS: TableDefinition<&[u8], &[u8]> = TableDefinition::new("enrollments");

pub(crate) const STARTUP_ENROLLMENT_INDEX: TableDefinition<&[u8], &str> =
    TableDefinition::new("startup_enrollment_index");

pub(crate) const ACCESS_REQUESTS: TableDefinition<&[u8], &[u8]> =
    TableDefinition::new("access_requests");

pub(crate) const SHORTLISTS: TableDefinition<&[u8], &[u8]> = TableDefinition::new("shortlists");

// =============================================================================
// Error Type
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("redb database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("database directory error: {0}")]
    Io(#[from] std::io::Error),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("already exists: {0}")]
    AlreadyExists(String),

    /// The document exists but is in the wrong lifecycle state for the write.
    #[error("invalid state: {0}")]
    InvalidState(String),

    #[error("permission denied: user {user_id} cannot access {resource}")]
    PermissionDenied { user_id: String, resource: String },
}

pub type StorageResult<T> = Result<T, StorageError>;

// =============================================================================
// Key Helpers
// =============================================================================

const KEY_SEPARATOR: u8 = 0x00;

/// Build a composite key by joining the parts with a NUL byte.
///
/// Names and emails are validated to contain no control characters, so the
/// separator never appears inside a part.
pub(crate) fn composite_key(parts: &[&str]) -> Vec<u8> {
    let len: usize = parts.iter().map(|p| p.len() + 1).sum();
    let mut key = Vec::with_capacity(len);
    for (i, part) in parts.iter().enumerate() {
        if i > 0 {
            key.push(KEY_SEPARATOR);
        }
        key.extend_from_slice(part.as_bytes());
    }
    key
}

/// Half-open range `[start, end)` covering every composite key whose first
/// parts equal `parts`.
pub(crate) fn prefix_range(parts: &[&str]) -> (Vec<u8>, Vec<u8>) {
    let mut start = composite_key(parts);
    start.push(KEY_SEPARATOR);
    let mut end = start.clone();
    if let Some(last) = end.last_mut() {
        *last = KEY_SEPARATOR + 1;
    }
    (start, end)
}

pub(crate) fn encode<T: Serialize>(value: &T) -> StorageResult<Vec<u8>> {
    Ok(serde_json::to_vec(value)?)
}

pub(crate) fn decode<T: DeserializeOwned>(bytes: &[u8]) -> StorageResult<T> {
    Ok(serde_json::from_slice(bytes)?)
}

// =============================================================================
// EventDatabase
// =============================================================================

/// Process-wide document database handle.
pub struct EventDatabase {
    db: Database,
}

impl EventDatabase {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let db = Database::create(path)?;
        Self::with_tables(db)
    }

    /// Volatile database, used by tests and throwaway local runs.
    pub fn in_memory() -> StorageResult<Self> {
        let db = Database::builder().create_with_backend(InMemoryBackend::new())?;
        Self::with_tables(db)
    }

    fn with_tables(db: Database) -> StorageResult<Self> {
        // Pre-create all tables so later read transactions don't fail
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(USERS)?;
            let _ = write_txn.open_table(EVENTS)?;
            let _ = write_txn.open_table(ORGANISER_EVENT_INDEX)?;
            let _ = write_txn.open_table(ENROLLMENTS)?;
            let _ = write_txn.open_table(STARTUP_ENROLLMENT_INDEX)?;
            let _ = write_txn.open_table(ACCESS_REQUESTS)?;
            let _ = write_txn.open_table(SHORTLISTS)?;
        }
        write_txn.commit()?;
        Ok(Self { db })
    }

    pub(crate) fn begin_read(&self) -> StorageResult<ReadTransaction> {
        Ok(self.db.begin_read()?)
    }

    pub(crate) fn begin_write(&self) -> StorageResult<WriteTransaction> {
        Ok(self.db.begin_write()?)
    }

    /// Verify the database answers a read transaction.
    pub fn health_check(&self) -> StorageResult<()> {
        let read_txn = self.db.begin_read()?;
        let _ = read_txn.open_table(EVENTS)?;
        Ok(())
    }
}
