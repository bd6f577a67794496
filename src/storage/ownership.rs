// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Ownership enforcement for organiser-scoped documents.
//!
//! Events belong to the organiser who created them; closing an event and
//! reading or deciding on its enrollments and access requests all pass through
//! [`OwnershipEnforcer::verify_ownership`].

use crate::auth::AuthenticatedUser;

use super::{StorageError, StorageResult};

/// Trait for resources that have an owner.
pub trait OwnedResource {
    /// Email of the owning user.
    fn owner_email(&self) -> &str;

    /// Short description used in permission errors.
    fn resource_label(&self) -> String;
}

/// Trait for enforcing ownership on storage operations.
pub trait OwnershipEnforcer {
    /// Verify that the user owns this resource.
    ///
    /// # Errors
    /// Returns `StorageError::PermissionDenied` if the user doesn't own the resource.
    fn verify_ownership(&self, user: &AuthenticatedUser) -> StorageResult<()>;
}

impl<T: OwnedResource> OwnershipEnforcer for T {
    fn verify_ownership(&self, user: &AuthenticatedUser) -> StorageResult<()> {
        if self.owner_email() == user.email {
            Ok(())
        } else {
            Err(StorageError::PermissionDenied {
                user_id: user.email.clone(),
                resource: self.resource_label(),
            })
        }
    }
}

/// Extension trait for verifying ownership on a fetched result.
pub trait OwnershipCheck<T> {
    /// Verify ownership and return the resource if authorized.
    fn verify_owner(self, user: &AuthenticatedUser) -> StorageResult<T>;
}

impl<T: OwnedResource> OwnershipCheck<T> for StorageResult<T> {
    fn verify_owner(self, user: &AuthenticatedUser) -> StorageResult<T> {
        let resource = self?;
        resource.verify_ownership(user)?;
        Ok(resource)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;

    struct TestResource {
        owner: String,
    }

    impl OwnedResource for TestResource {
        fn owner_email(&self) -> &str {
            &self.owner
        }

        fn resource_label(&self) -> String {
            "test resource".to_string()
        }
    }

    fn make_user(email: &str) -> AuthenticatedUser {
        AuthenticatedUser {
            user_id: "uid-1".to_string(),
            email: email.to_string(),
            name: "Test".to_string(),
            role: Role::Organiser,
            expires_at: 0,
        }
    }

    #[test]
    fn owner_passes() {
        let resource = TestResource {
            owner: "o@example.com".to_string(),
        };
        assert!(resource.verify_ownership(&make_user("o@example.com")).is_ok());
    }

    #[test]
    fn non_owner_is_denied() {
        let resource = TestResource {
            owner: "o@example.com".to_string(),
        };
        let result = resource.verify_ownership(&make_user("other@example.com"));
        match result {
            Err(StorageError::PermissionDenied { user_id, resource }) => {
                assert_eq!(user_id, "other@example.com");
                assert_eq!(resource, "test resource");
            }
            other => panic!("expected PermissionDenied, got {other:?}"),
        }
    }

    #[test]
    fn verify_owner_propagates_lookup_errors() {
        let lookup: StorageResult<TestResource> =
            Err(StorageError::NotFound("Event Demo".to_string()));
        let result = lookup.verify_owner(&make_user("o@example.com"));
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }
}
