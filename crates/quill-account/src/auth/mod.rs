//! Token signing and password hashing for the account lifecycle core.
//!
//! The signer issues the register and password-reset tokens; the password
//! module is the one-way hashing capability used when an account is created
//! or its password is overwritten.

pub mod claims;
pub mod password;
pub mod signer;

pub use claims::{Claims, TokenPurpose};
pub use signer::TokenSigner;
