//! One-way password hashing using argon2id.
//!
//! The lifecycle core only ever writes hashes (account creation, password
//! reset); verification is here for the login path that consumes them.

use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};

/// Hash a plaintext password with a random salt.
pub fn hash(plaintext: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let digest = Argon2::default().hash_password(plaintext.as_bytes(), &salt)?;
    Ok(digest.to_string())
}

/// Verify a plaintext password against a stored hash.
pub fn verify(plaintext: &str, stored: &str) -> Result<bool, argon2::password_hash::Error> {
    let parsed = PasswordHash::new(stored)?;
    Ok(Argon2::default()
        .verify_password(plaintext.as_bytes(), &parsed)
        .is_ok())
}
