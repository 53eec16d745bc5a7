//! Request and response types for the account service.

use serde::{Deserialize, Serialize};

use crate::storage::Account;

/// Payload for account creation.
#[derive(Debug, Clone, Deserialize)]
pub struct NewAccount {
    pub email: String,
    pub name: String,
    pub blog_id: String,
    pub password: String,
    /// Verification code previously issued for `email`. Required unless a
    /// register token accompanies the request.
    pub verify_code: Option<String>,
}

/// Profile fields an account owner may change. Absent fields are left
/// untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModifyAccount {
    pub name: Option<String>,
    pub biography: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub homepage: Option<String>,
}

/// Public projection of an account, safe to hand to any caller.
#[derive(Debug, Clone, Serialize)]
pub struct AccountProfile {
    pub id: String,
    pub email: String,
    pub name: String,
    pub blog_id: String,
    pub biography: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub homepage: Option<String>,
    pub roles: Vec<String>,
    pub created_at: i64,
}

impl AccountProfile {
    pub(crate) fn from_account(account: Account, roles: Vec<String>) -> Self {
        Self {
            id: account.id,
            email: account.email,
            name: account.name,
            blog_id: account.blog_id,
            biography: account.biography,
            company: account.company,
            location: account.location,
            homepage: account.homepage,
            roles,
            created_at: account.created_at,
        }
    }
}
