// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::SessionIssuer;
use crate::storage::EventDatabase;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<EventDatabase>,
    pub sessions: Arc<SessionIssuer>,
}

impl AppState {
    pub fn new(db: EventDatabase, sessions: SessionIssuer) -> Self {
        Self {
            db: Arc::new(db),
            sessions: Arc::new(sessions),
        }
    }

    /// In-memory database with a fixed signing secret.
    #[cfg(test)]
    pub fn for_tests() -> Self {
        let db = EventDatabase::in_memory().expect("in-memory database");
        let sessions = SessionIssuer::new(b"test-secret", "pitchday", 30);
        Self::new(db, sessions)
    }
}
