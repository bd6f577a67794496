// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Pitchday - Offline Startup Pitching Event Service
//!
//! REST API through which organisers publish pitching events, startups enroll
//! with their ideas, and investors request access to an event's enrollments
//! and shortlist startups once the event has closed.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Password accounts, session tokens and role extractors
//! - `config` - Environment configuration
//! - `storage` - Embedded document database (redb)

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod state;
pub mod storage;
