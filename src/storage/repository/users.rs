// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Credential store.
//!
//! Users are keyed by their lower-cased email, which is also the identity
//! carried in session tokens.

use chrono::{DateTime, Utc};
use redb::ReadableTable;
use serde::{Deserialize, Serialize};

use super::super::database::{decode, encode, USERS};
use super::super::{EventDatabase, StorageError, StorageResult};
use crate::auth::Role;

/// User document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserRecord {
    /// Unique user identifier (UUID)
    pub id: String,
    /// Login email (lower-cased, unique)
    pub email: String,
    /// Display name
    pub name: String,
    /// Role chosen at registration; never changes afterwards
    pub role: Role,
    /// Argon2 PHC string
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl UserRecord {
    pub fn new(email: String, name: String, role: Role, password_hash: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            email,
            name,
            role,
            password_hash,
            created_at: Utc::now(),
        }
    }
}

/// Repository for user operations.
pub struct UserRepository<'a> {
    db: &'a EventDatabase,
}

impl<'a> UserRepository<'a> {
    pub fn new(db: &'a EventDatabase) -> Self {
        Self { db }
    }

    /// Look up a user by email.
    pub fn find_by_email(&self, email: &str) -> StorageResult<Option<UserRecord>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(USERS)?;
        let user = match table.get(email)? {
            Some(value) => Some(decode(value.value())?),
            None => None,
        };
        Ok(user)
    }

    /// Get a user by email, failing if absent.
    pub fn get(&self, email: &str) -> StorageResult<UserRecord> {
        self.find_by_email(email)?
            .ok_or_else(|| StorageError::NotFound(format!("User {email}")))
    }

    /// Insert a new user.
    ///
    /// Fails with `AlreadyExists` when the email is already registered.
    pub fn create(&self, user: &UserRecord) -> StorageResult<()> {
        let json = encode(user)?;
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(USERS)?;
            if table.get(user.email.as_str())?.is_some() {
                return Err(StorageError::AlreadyExists(format!("User {}", user.email)));
            }
            table.insert(user.email.as_str(), json.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }
}
