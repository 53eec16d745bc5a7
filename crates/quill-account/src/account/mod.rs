//! Account lifecycle service.
//!
//! Orchestrates account creation, email verification codes, and password
//! reset on top of the storage layer, the token signer, and the ephemeral
//! credential store.

pub mod service;
pub mod types;


pub use service::{AccountService, VerificationTtls};
pub use types::{AccountProfile, ModifyAccount, NewAccount};
