// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Password hashing (Argon2id, PHC string format).

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use ring::rand::{SecureRandom, SystemRandom};
use std::sync::OnceLock;

/// Salt length in bytes.
const SALT_LEN: usize = 16;

#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("system random number generator failed")]
    Rng,

    #[error("password hashing failed: {0}")]
    Hash(String),
}

/// Hash a plaintext password with a fresh random salt.
pub fn hash_password(plain: &str) -> Result<String, PasswordError> {
    let mut salt_bytes = [0u8; SALT_LEN];
    SystemRandom::new()
        .fill(&mut salt_bytes)
        .map_err(|_| PasswordError::Rng)?;

    let salt = SaltString::encode_b64(&salt_bytes).map_err(|e| PasswordError::Hash(e.to_string()))?;
    let hash = Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| PasswordError::Hash(e.to_string()))?;
    Ok(hash.to_string())
}

/// Check a plaintext password against a stored PHC string.
///
/// An unparsable stored hash never verifies.
fn verify_password(plain: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(plain.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

/// Check a login attempt. With no stored hash the password is still run
/// through Argon2 against a throwaway hash, so unknown accounts cost the same
/// time as wrong passwords.
pub fn verify_login(plain: &str, stored: Option<&str>) -> bool {
    match stored {
        Some(hash) => verify_password(plain, hash),
        None => {
            if let Some(dummy) = unknown_account_hash() {
                verify_password(plain, dummy);
            }
            false
        }
    }
}

fn unknown_account_hash() -> Option<&'static str> {
    static HASH: OnceLock<Option<String>> = OnceLock::new();
    HASH.get_or_init(|| hash_password("unknown-account").ok()).as_deref()
}
