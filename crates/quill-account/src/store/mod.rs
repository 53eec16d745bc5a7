//! Ephemeral credential store.
//!
//! Verification codes and password reset tokens live in a shared key-value
//! store with per-key TTLs. The service depends on the [`CredentialStore`]
//! trait, never on a concrete store, so tests run against [`MemoryStore`]
//! and production can wire a networked store without touching the service.
//!
//! Two operations carry the whole design: `set_if_absent` must be atomic so
//! concurrent issuance for the same key cannot both succeed, and
//! `get_and_delete` must be atomic so concurrent reset attempts with the
//! same token cannot both pass.

use std::time::Duration;

use async_trait::async_trait;

pub mod memory;

pub use memory::MemoryStore;

/// Shared key-value store with per-key time-to-live.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Write `value` under `key` only if no live value exists. Returns
    /// whether the write happened.
    async fn set_if_absent(&self, key: &str, value: &str, ttl: Duration) -> bool;

    /// Read the live value under `key`, if any.
    async fn get(&self, key: &str) -> Option<String>;

    /// Read and remove the live value under `key` in one step.
    async fn get_and_delete(&self, key: &str) -> Option<String>;

    /// Whether a live value exists under `key`.
    async fn exists(&self, key: &str) -> bool;
}

/// Store key for an email verification code.
///
/// The exact format is shared with existing deployments; do not change it.
pub fn verify_code_key(email: &str) -> String {
    format!("email-verify-code: {email}")
}

/// Store key for a password reset token.
///
/// The exact format is shared with existing deployments; do not change it.
pub fn reset_token_key(email: &str) -> String {
    format!("password-reset-token: {email}")
}
