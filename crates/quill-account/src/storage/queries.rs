//! Database queries for Quill account storage.

use quill_core::db::{DatabaseError, unix_timestamp};

use super::db::AccountDatabase;
use super::models::{Account, Role};

impl AccountDatabase {
    // =========================================================================
    // Account queries
    // =========================================================================

    /// Create a new account.
    ///
    /// A unique-index violation on email or blog_id surfaces as
    /// [`DatabaseError::Conflict`]; the pre-checks in the service are a fast
    /// path, this is the backstop.
    pub async fn create_account(
        &self,
        id: &str,
        email: &str,
        name: &str,
        blog_id: &str,
        password_hash: &str,
    ) -> Result<Account, DatabaseError> {
        let now = unix_timestamp();

        sqlx::query(
            "INSERT INTO accounts (id, email, name, blog_id, password_hash, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(id)
        .bind(email)
        .bind(name)
        .bind(blog_id)
        .bind(password_hash)
        .bind(now)
        .bind(now)
        .execute(self.pool())
        .await?;

        self.get_account(id).await
    }

    /// Get an account by ID.
    pub async fn get_account(&self, id: &str) -> Result<Account, DatabaseError> {
        sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool())
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("Account {id}")))
    }

    /// Find a non-deleted account by email.
    pub async fn find_by_email_not_deleted(
        &self,
        email: &str,
    ) -> Result<Option<Account>, DatabaseError> {
        let account = sqlx::query_as::<_, Account>(
            "SELECT * FROM accounts WHERE email = ? AND deleted = 0",
        )
        .bind(email)
        .fetch_optional(self.pool())
        .await?;

        Ok(account)
    }

    /// Whether any account (deleted or not) uses this email.
    pub async fn exists_by_email(&self, email: &str) -> Result<bool, DatabaseError> {
        let row: (i64,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM accounts WHERE email = ?)")
            .bind(email)
            .fetch_one(self.pool())
            .await?;

        Ok(row.0 != 0)
    }

    /// Whether any account (deleted or not) uses this blog id.
    pub async fn exists_by_blog_id(&self, blog_id: &str) -> Result<bool, DatabaseError> {
        let row: (i64,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM accounts WHERE blog_id = ?)")
                .bind(blog_id)
                .fetch_one(self.pool())
                .await?;

        Ok(row.0 != 0)
    }

    /// Overwrite an account's password hash.
    pub async fn update_password(
        &self,
        id: &str,
        password_hash: &str,
    ) -> Result<(), DatabaseError> {
        let now = unix_timestamp();

        let result = sqlx::query("UPDATE accounts SET password_hash = ?, updated_at = ? WHERE id = ?")
            .bind(password_hash)
            .bind(now)
            .bind(id)
            .execute(self.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("Account {id}")));
        }
        Ok(())
    }

    /// Update the profile fields that are present; absent fields keep their
    /// current value.
    pub async fn update_profile(
        &self,
        id: &str,
        name: Option<&str>,
        biography: Option<&str>,
        company: Option<&str>,
        location: Option<&str>,
        homepage: Option<&str>,
    ) -> Result<Account, DatabaseError> {
        let now = unix_timestamp();

        sqlx::query(
            "UPDATE accounts SET \
             name = COALESCE(?, name), \
             biography = COALESCE(?, biography), \
             company = COALESCE(?, company), \
             location = COALESCE(?, location), \
             homepage = COALESCE(?, homepage), \
             updated_at = ? \
             WHERE id = ?",
        )
        .bind(name)
        .bind(biography)
        .bind(company)
        .bind(location)
        .bind(homepage)
        .bind(now)
        .bind(id)
        .execute(self.pool())
        .await?;

        self.get_account(id).await
    }

    /// Soft-delete an account. Rows are never hard-deleted.
    pub async fn mark_deleted(&self, id: &str) -> Result<bool, DatabaseError> {
        let now = unix_timestamp();

        let result = sqlx::query("UPDATE accounts SET deleted = 1, updated_at = ? WHERE id = ?")
            .bind(now)
            .bind(id)
            .execute(self.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    // Role queries
    // =========================================================================

    /// Create a role if it does not exist yet, and return it.
    pub async fn ensure_role(&self, name: &str) -> Result<Role, DatabaseError> {
        let now = unix_timestamp();

        sqlx::query("INSERT OR IGNORE INTO roles (name, created_at) VALUES (?, ?)")
            .bind(name)
            .bind(now)
            .execute(self.pool())
            .await?;

        sqlx::query_as::<_, Role>("SELECT * FROM roles WHERE name = ?")
            .bind(name)
            .fetch_optional(self.pool())
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("Role {name}")))
    }

    /// Attach a role to an account. Idempotent.
    pub async fn assign_role(&self, account_id: &str, role_name: &str) -> Result<(), DatabaseError> {
        sqlx::query("INSERT OR IGNORE INTO account_roles (account_id, role_name) VALUES (?, ?)")
            .bind(account_id)
            .bind(role_name)
            .execute(self.pool())
            .await?;

        Ok(())
    }

    /// Role names attached to an account.
    pub async fn roles_for_account(&self, account_id: &str) -> Result<Vec<String>, DatabaseError> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT role_name FROM account_roles WHERE account_id = ? ORDER BY role_name",
        )
        .bind(account_id)
        .fetch_all(self.pool())
        .await?;

        Ok(rows.into_iter().map(|r| r.0).collect())
    }
}
