//! Data models for Quill account storage.

use serde::{Deserialize, Serialize};

/// An account row.
///
/// `deleted` accounts are retained forever; nothing in the storage layer
/// ever hard-deletes a row. The password hash never leaves the process
/// through serialization.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Account {
    pub id: String,
    pub email: String,
    pub name: String,
    pub blog_id: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub biography: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub homepage: Option<String>,
    pub deleted: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Role {
    pub name: String,
    pub created_at: i64,
}

/// The role every freshly created account receives.
pub const ROLE_USER: &str = "user";
