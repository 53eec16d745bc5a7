//! SQLite storage for Quill accounts.
//!
//! Provides persistence for accounts, roles, and the account/role relation.

mod db;
mod models;
mod queries;

#[cfg(test)]
mod tests;

pub use db::AccountDatabase;
pub use models::*;
