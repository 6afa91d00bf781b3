//! Account password storage.
//!
//! Stored passwords are Argon2id PHC strings. Verification reads the cost
//! parameters back out of the stored string, so raising the costs below only
//! affects passwords hashed afterwards.

use std::sync::OnceLock;

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use rand_core::OsRng;
use thiserror::Error;

/// Shortest accepted password, in characters.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Longest accepted password, in characters.
pub const MAX_PASSWORD_LENGTH: usize = 128;

// Memory (KiB), passes and lanes for new hashes.
const MEMORY_KIB: u32 = 64 * 1024;
const PASSES: u32 = 3;
const LANES: u32 = 4;

#[derive(Error, Debug)]
pub enum PasswordError {
    #[error("password must be at least {MIN_PASSWORD_LENGTH} characters")]
    TooShort,

    #[error("password must be at most {MAX_PASSWORD_LENGTH} characters")]
    TooLong,

    #[error("password hashing failed: {0}")]
    HashError(String),

    /// The stored value is not a PHC string.
    #[error("invalid password hash format")]
    InvalidHash,

    #[error("password verification failed")]
    VerificationFailed,
}

fn hasher() -> Result<Argon2<'static>, PasswordError> {
    let params = Params::new(MEMORY_KIB, PASSES, LANES, None)
        .map_err(|e| PasswordError::HashError(e.to_string()))?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// Hash a new account password with a fresh salt.
///
/// The password must pass [`validate_password`] first.
///
/// ```
/// let stored = noteboard::hash_password("my_secure_password").unwrap();
/// assert!(stored.starts_with("$argon2id$"));
/// ```
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    validate_password(password)?;

    let salt = SaltString::generate(&mut OsRng);
    let hash = hasher()?
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::HashError(e.to_string()))?;

    Ok(hash.to_string())
}

/// Check a login attempt against the stored hash of an account.
///
/// ```
/// use noteboard::{hash_password, verify_password};
///
/// let stored = hash_password("my_secure_password").unwrap();
/// assert!(verify_password("my_secure_password", &stored).is_ok());
/// assert!(verify_password("wrong_password", &stored).is_err());
/// ```
pub fn verify_password(password: &str, hash: &str) -> Result<(), PasswordError> {
    let stored = PasswordHash::new(hash).map_err(|_| PasswordError::InvalidHash)?;

    Argon2::default()
        .verify_password(password.as_bytes(), &stored)
        .map_err(|_| PasswordError::VerificationFailed)
}

/// Spend one verification on a throwaway hash.
///
/// Login calls this when no account matches the username, so an unknown
/// name costs as much time as a wrong password.
pub fn verify_dummy_password(password: &str) {
    static DUMMY_HASH: OnceLock<Option<String>> = OnceLock::new();

    let hash = DUMMY_HASH.get_or_init(|| hash_password("unused-account-password").ok());
    if let Some(hash) = hash {
        let _ = verify_password(password, hash);
    }
}

/// Length check shared by sign-up and password hashing.
///
/// ```
/// use noteboard::validate_password;
///
/// assert!(validate_password("short").is_err());
/// assert!(validate_password("valid_password_123").is_ok());
/// ```
pub fn validate_password(password: &str) -> Result<(), PasswordError> {
    let length = password.chars().count();
    if length < MIN_PASSWORD_LENGTH {
        Err(PasswordError::TooShort)
    } else if length > MAX_PASSWORD_LENGTH {
        Err(PasswordError::TooLong)
    } else {
        Ok(())
    }
}
