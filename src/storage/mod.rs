// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Storage Module
//!
//! Persistent state lives in a single embedded redb file (see
//! [`database`] for the table layout). Repositories borrow the shared
//! [`EventDatabase`] and expose typed operations per document kind.
//!
//! ## Consistency
//!
//! - Uniqueness is enforced by primary keys, not by application lookups
//! - Each precondition check runs in the same write transaction as its write
//! - Ownership checks go through [`OwnershipEnforcer`]

pub mod database;
pub mod ownership;
pub mod repository;

pub use database::{EventDatabase, StorageError, StorageResult};
pub use ownership::{OwnedResource, OwnershipCheck, OwnershipEnforcer};
pub use repository::{
    AccessRepository, AccessRequestRecord, AccessStatus, EnrollmentRecord, EnrollmentRepository,
    EnrollmentStatus, EventRecord, EventRepository, EventStatus, ShortlistRecord,
    ShortlistRepository, UserRecord, UserRepository,
};
