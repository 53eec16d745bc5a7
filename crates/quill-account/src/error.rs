//! Error taxonomy for account lifecycle operations.
//!
//! Every operation fails with one of three caller-visible classes --
//! bad request, conflict, or not found -- plus an internal class for
//! infrastructure failures. The HTTP layer maps [`ErrorKind`] onto status
//! codes; the variants carry the finer-grained code.

use thiserror::Error;

use crate::mail::MailError;
use quill_core::db::DatabaseError;

/// Result type alias using [`AccountError`].
pub type Result<T> = std::result::Result<T, AccountError>;

/// Errors surfaced by the account lifecycle service.
#[derive(Debug, Error)]
pub enum AccountError {
    /// Malformed or mismatched register/reset token. Deliberately carries no
    /// detail about which check failed.
    #[error("invalid request")]
    InvalidRequest,

    /// Submitted verification code or reset artifact is absent, blank,
    /// consumed, or does not match the stored value.
    #[error("invalid email verification code")]
    InvalidVerifyCode,

    /// An account already exists for this email.
    #[error("email is already registered")]
    EmailAlreadyExists,

    /// An account already exists for this blog id.
    #[error("blog id is already registered")]
    BlogIdAlreadyExists,

    /// A verification code is still outstanding for this email.
    #[error("a verification code has already been issued")]
    VerifyCodeAlreadyIssued,

    /// A password reset token is still outstanding for this email.
    #[error("a password reset token has already been issued")]
    ResetTokenAlreadyIssued,

    /// No account for the given id.
    #[error("account not found")]
    NotFound,

    /// No account registered for the given email.
    #[error("no account registered for this email")]
    EmailNotFound,

    /// Storage failure.
    #[error("storage error: {0}")]
    Storage(#[from] DatabaseError),

    /// Token signing failure.
    #[error("token signing failed: {0}")]
    Signer(String),

    /// Password hashing failure.
    #[error("password hashing failed")]
    Hash,

    /// Mail delivery failure.
    #[error(transparent)]
    Mail(#[from] MailError),
}

/// Caller-visible error class, for mapping onto transport status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    BadRequest,
    Conflict,
    NotFound,
    Internal,
}

impl AccountError {
    /// The taxonomy class of this error.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidRequest | Self::InvalidVerifyCode => ErrorKind::BadRequest,
            Self::EmailAlreadyExists
            | Self::BlogIdAlreadyExists
            | Self::VerifyCodeAlreadyIssued
            | Self::ResetTokenAlreadyIssued => ErrorKind::Conflict,
            Self::NotFound | Self::EmailNotFound => ErrorKind::NotFound,
            Self::Storage(_) | Self::Signer(_) | Self::Hash | Self::Mail(_) => ErrorKind::Internal,
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic, clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_the_taxonomy() {
        assert_eq!(AccountError::InvalidRequest.kind(), ErrorKind::BadRequest);
        assert_eq!(AccountError::InvalidVerifyCode.kind(), ErrorKind::BadRequest);
        assert_eq!(AccountError::EmailAlreadyExists.kind(), ErrorKind::Conflict);
        assert_eq!(AccountError::BlogIdAlreadyExists.kind(), ErrorKind::Conflict);
        assert_eq!(
            AccountError::VerifyCodeAlreadyIssued.kind(),
            ErrorKind::Conflict
        );
        assert_eq!(
            AccountError::ResetTokenAlreadyIssued.kind(),
            ErrorKind::Conflict
        );
        assert_eq!(AccountError::NotFound.kind(), ErrorKind::NotFound);
        assert_eq!(AccountError::EmailNotFound.kind(), ErrorKind::NotFound);
        assert_eq!(
            AccountError::Signer("boom".into()).kind(),
            ErrorKind::Internal
        );
    }
}
