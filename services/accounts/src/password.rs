//! Argon2id password hashing.
//!
//! Hashes are PHC strings (algorithm, params, salt and digest in one value),
//! so verification needs no side table.

use argon2::password_hash::SaltString;
use argon2::password_hash::rand_core::OsRng;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};

use crate::error::AccountsServiceError;

/// Minimum accepted password length.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Hash a plaintext password with a fresh random salt.
pub fn hash_password(plaintext: &str) -> Result<String, AccountsServiceError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(plaintext.as_bytes(), &salt)
        .map_err(|e| AccountsServiceError::Internal(anyhow::anyhow!("hash password: {e}")))?;
    Ok(hash.to_string())
}

/// Constant-time verification against a stored PHC hash.
/// A malformed stored hash counts as a mismatch, not an error.
pub fn verify_password(plaintext: &str, stored_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored_hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(plaintext.as_bytes(), &parsed)
        .is_ok()
}

/// Enforce the password policy on registration and password changes.
pub fn validate_new_password(
    password: &str,
    confirmation: &str,
) -> Result<(), AccountsServiceError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AccountsServiceError::WeakPassword);
    }
    if password != confirmation {
        return Err(AccountsServiceError::PasswordMismatch);
    }
    Ok(())
}
