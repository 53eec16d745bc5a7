//! Claims carried by signed register and password-reset tokens.

use serde::{Deserialize, Serialize};

/// What a signed token authorises. The purpose is baked into the token so a
/// register token can never be replayed against the reset flow (or vice
/// versa).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenPurpose {
    Register,
    PasswordReset,
}

impl TokenPurpose {
    /// Wire representation stored in the `purpose` claim.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Register => "register",
            Self::PasswordReset => "reset-password",
        }
    }
}

/// Claims embedded in signed account-lifecycle tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Token ID (unique per token).
    pub jti: String,
    /// Subject (account email).
    pub sub: String,
    /// Purpose discriminator: "register" or "reset-password".
    pub purpose: String,
    /// Issued at (unix timestamp).
    pub iat: i64,
    /// Expiration (unix timestamp).
    pub exp: i64,
}

impl Claims {
    pub fn is_register(&self) -> bool {
        self.purpose == TokenPurpose::Register.as_str()
    }

    pub fn is_password_reset(&self) -> bool {
        self.purpose == TokenPurpose::PasswordReset.as_str()
    }
}
