// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Repository layer providing typed access to the event database.
//!
//! Each repository borrows the [`EventDatabase`](super::EventDatabase) and
//! owns the tables of one document kind.

pub mod access;
pub mod enrollments;
pub mod events;
pub mod shortlists;
pub mod users;

pub use access::{AccessRepository, AccessRequestRecord, AccessStatus};
pub use enrollments::{EnrollmentRecord, EnrollmentRepository, EnrollmentStatus};
pub use events::{EventRecord, EventRepository, EventStatus};
pub use shortlists::{ShortlistRecord, ShortlistRepository};
pub use users::{UserRecord, UserRepository};
