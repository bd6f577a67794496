// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User roles for authorization.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// User roles for authorization.
///
/// ## Roles
///
/// - `Organiser` - Creates events, closes them and decides access requests
/// - `Startup` - Browses events and enrolls with a pitch
/// - `Investor` - Requests access to an event's enrollments and shortlists
///
/// A role is chosen at registration and never changes. Roles are flat; no
/// role implies another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Organiser = 1,
    Startup = 2,
    Investor = 4,
}

impl Role {
    /// Bit used in role masks (see [`RequireRole`](super::RequireRole)).
    pub const fn bit(self) -> u8 {
        self as u8
    }

    /// Whether this role is one of the roles in `mask`.
    pub const fn is_in(self, mask: u8) -> bool {
        self.bit() & mask != 0
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Organiser => write!(f, "organiser"),
            Role::Startup => write!(f, "startup"),
            Role::Investor => write!(f, "investor"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bits_are_distinct() {
        let all = [Role::Organiser, Role::Startup, Role::Investor];
        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                assert_eq!(a.bit() & b.bit(), 0);
            }
        }
    }

    #[test]
    fn mask_membership() {
        let participants = Role::Startup.bit() | Role::Investor.bit();
        assert!(Role::Startup.is_in(participants));
        assert!(Role::Investor.is_in(participants));
        assert!(!Role::Organiser.is_in(participants));
        assert!(Role::Organiser.is_in(Role::Organiser.bit()));
    }

    #[test]
    fn serde_uses_lowercase_names() {
        assert_eq!(serde_json::to_string(&Role::Organiser).unwrap(), r#""organiser""#);
        let parsed: Role = serde_json::from_str(r#""investor""#).unwrap();
        assert_eq!(parsed, Role::Investor);
        assert!(serde_json::from_str::<Role>(r#""admin""#).is_err());
    }
}
