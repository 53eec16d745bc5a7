//! Quill Account Lifecycle Library
//!
//! The account creation and credential-issuance core of the Quill blog
//! platform:
//! - Account registration via email verification code or signed register token
//! - Email verification code issuance (single outstanding code per email)
//! - Password reset token issuance and single-use consumption
//! - SQLite storage for accounts and roles
//! - Token signing, password hashing, and the ephemeral credential store seam
//!
//! HTTP routing, blog content, attachments, and mail transport live in other
//! components; this crate exposes the service they call into.

pub mod account;
pub mod auth;
pub mod error;
pub mod mail;
pub mod storage;
pub mod store;

pub use account::{AccountProfile, AccountService, ModifyAccount, NewAccount, VerificationTtls};
pub use error::{AccountError, ErrorKind, Result};
