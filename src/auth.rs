//! Password hashing and anonymous sync identities.

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use rand::rngs::OsRng;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error, PartialEq)]
pub enum AuthError {
    #[error("password must not be empty")]
    EmptyPassword,
    #[error("password hashing failed: {0}")]
    Hash(String),
    #[error("stored password hash is malformed: {0}")]
    MalformedHash(String),
}

fn hasher() -> Argon2<'static> {
    Argon2::new(Algorithm::Argon2id, Version::V0x13, Params::default())
}

/// Hashes `plain` with Argon2id and a random salt, returning a PHC string.
pub fn hash_password(plain: &str) -> Result<String, AuthError> {
    if plain.is_empty() {
        return Err(AuthError::EmptyPassword);
    }
    let salt = SaltString::generate(&mut OsRng);
    hasher()
        .hash_password(plain.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| AuthError::Hash(err.to_string()))
}

/// Checks `plain` against a PHC string produced by [`hash_password`].
pub fn verify_password(plain: &str, phc: &str) -> Result<bool, AuthError> {
    if plain.is_empty() {
        return Err(AuthError::EmptyPassword);
    }
    let parsed = PasswordHash::new(phc).map_err(|err| AuthError::MalformedHash(err.to_string()))?;
    Ok(hasher().verify_password(plain.as_bytes(), &parsed).is_ok())
}

/// Fresh identity for anonymous cloud sync.
pub fn new_anonymous_id() -> String {
    Uuid::new_v4().to_string()
}
