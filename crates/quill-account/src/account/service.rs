//! Account lifecycle operations.

use std::sync::Arc;
use std::time::Duration;

use rand::RngExt;
use tracing::{info, instrument};

use crate::auth::claims::TokenPurpose;
use crate::auth::password;
use crate::auth::signer::TokenSigner;
use crate::error::{AccountError, Result};
use crate::mail::{MailMessage, Mailer};
use crate::storage::{AccountDatabase, ROLE_USER};
use crate::store::{CredentialStore, reset_token_key, verify_code_key};
use quill_core::db::DatabaseError;

use super::types::{AccountProfile, ModifyAccount, NewAccount};

/// Store-side lifetimes for the two verification artifacts.
#[derive(Debug, Clone, Copy)]
pub struct VerificationTtls {
    pub code: Duration,
    pub reset_token: Duration,
}

impl Default for VerificationTtls {
    fn default() -> Self {
        Self {
            code: Duration::from_secs(3 * 60),
            reset_token: Duration::from_secs(3 * 60),
        }
    }
}

/// The account lifecycle core.
///
/// Holds no mutable state of its own; everything cross-request lives in the
/// account database and the credential store. The store's atomic
/// set-if-absent and get-and-delete are what make duplicate issuance and
/// double consumption impossible under concurrency.
pub struct AccountService {
    db: AccountDatabase,
    store: Arc<dyn CredentialStore>,
    signer: Arc<TokenSigner>,
    mailer: Arc<dyn Mailer>,
    ttls: VerificationTtls,
}

impl AccountService {
    /// Create a service with the default artifact TTLs (3 minutes).
    pub fn new(
        db: AccountDatabase,
        store: Arc<dyn CredentialStore>,
        signer: Arc<TokenSigner>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self::with_ttls(db, store, signer, mailer, VerificationTtls::default())
    }

    /// Create a service with explicit artifact TTLs.
    pub fn with_ttls(
        db: AccountDatabase,
        store: Arc<dyn CredentialStore>,
        signer: Arc<TokenSigner>,
        mailer: Arc<dyn Mailer>,
        ttls: VerificationTtls,
    ) -> Self {
        Self {
            db,
            store,
            signer,
            mailer,
            ttls,
        }
    }

    /// Create an account.
    ///
    /// With a register token the token's subject must be the email being
    /// registered; without one, a previously issued verification code must
    /// accompany the payload. Either way the email and blog id must both be
    /// unused, checked in that order.
    #[instrument(
        skip(self, new_account, register_token),
        fields(email = %new_account.email, blog_id = %new_account.blog_id)
    )]
    pub async fn create_account(
        &self,
        new_account: NewAccount,
        register_token: Option<&str>,
    ) -> Result<AccountProfile> {
        let needs_code = match register_token {
            Some(token) => {
                // Signature failure and subject mismatch are deliberately the
                // same error; the response must not reveal which check failed.
                let subject = self
                    .signer
                    .verify(token, TokenPurpose::Register)
                    .ok_or(AccountError::InvalidRequest)?;
                if subject != new_account.email {
                    return Err(AccountError::InvalidRequest);
                }
                false
            }
            None => true,
        };

        if self.db.exists_by_email(&new_account.email).await? {
            return Err(AccountError::EmailAlreadyExists);
        }
        if self.db.exists_by_blog_id(&new_account.blog_id).await? {
            return Err(AccountError::BlogIdAlreadyExists);
        }

        let code_key = verify_code_key(&new_account.email);
        if needs_code {
            // Plain get here: a mismatched attempt must not burn the code.
            let stored = self
                .store
                .get(&code_key)
                .await
                .ok_or(AccountError::InvalidVerifyCode)?;
            let submitted = new_account.verify_code.as_deref().unwrap_or_default();
            if stored.trim().is_empty() || stored != submitted {
                return Err(AccountError::InvalidVerifyCode);
            }
        }

        let password_hash =
            password::hash(&new_account.password).map_err(|_| AccountError::Hash)?;
        let account_id = uuid::Uuid::new_v4().to_string();

        let account = self
            .db
            .create_account(
                &account_id,
                &new_account.email,
                &new_account.name,
                &new_account.blog_id,
                &password_hash,
            )
            .await
            .map_err(|e| match e {
                // The unique indexes are the backstop for pre-checks that
                // raced; surface the same conflicts they would have raised.
                DatabaseError::Conflict(msg) if msg.contains("blog_id") => {
                    AccountError::BlogIdAlreadyExists
                }
                DatabaseError::Conflict(_) => AccountError::EmailAlreadyExists,
                other => AccountError::Storage(other),
            })?;

        if needs_code {
            // The code gated exactly this creation; consume it.
            let _ = self.store.get_and_delete(&code_key).await;
        }

        self.db.ensure_role(ROLE_USER).await?;
        self.db.assign_role(&account.id, ROLE_USER).await?;
        let roles = self.db.roles_for_account(&account.id).await?;

        info!(account_id = %account.id, email = %account.email, "Account created");

        Ok(AccountProfile::from_account(account, roles))
    }

    /// Issue an email verification code for a not-yet-registered email.
    ///
    /// At most one code is live per email; the store's atomic set-if-absent
    /// is the issuance guard, so two racing requests cannot both succeed.
    #[instrument(skip(self))]
    pub async fn issue_verify_code(&self, email: &str) -> Result<String> {
        if self.db.exists_by_email(email).await? {
            return Err(AccountError::EmailAlreadyExists);
        }

        let code = new_verify_code();
        let written = self
            .store
            .set_if_absent(&verify_code_key(email), &code, self.ttls.code)
            .await;
        if !written {
            return Err(AccountError::VerifyCodeAlreadyIssued);
        }

        info!(email, "Verification code issued");
        Ok(code)
    }

    /// Issue a verification code and hand it to the mail collaborator.
    #[instrument(skip(self))]
    pub async fn send_verify_code(&self, email: &str) -> Result<()> {
        let code = self.issue_verify_code(email).await?;
        let minutes = self.ttls.code.as_secs() / 60;

        self.mailer
            .send(MailMessage {
                to: email.to_string(),
                subject: "Your Quill verification code".to_string(),
                body: format!(
                    "Your verification code is {code}. It expires in {minutes} minutes."
                ),
                html: false,
            })
            .await?;

        Ok(())
    }

    /// Issue a password reset token for a registered email.
    ///
    /// The signed token is also stored as the live artifact for the email,
    /// so possessing the string alone is not enough to reset: it must still
    /// be the current one.
    #[instrument(skip(self))]
    pub async fn issue_reset_token(&self, email: &str) -> Result<String> {
        if !self.db.exists_by_email(email).await? {
            return Err(AccountError::EmailNotFound);
        }

        let token = self
            .signer
            .issue_reset_token(email)
            .map_err(|e| AccountError::Signer(e.to_string()))?;

        let written = self
            .store
            .set_if_absent(&reset_token_key(email), &token, self.ttls.reset_token)
            .await;
        if !written {
            return Err(AccountError::ResetTokenAlreadyIssued);
        }

        info!(email, "Password reset token issued");
        Ok(token)
    }

    /// Consume a reset token and overwrite the account's password.
    ///
    /// The atomic get-and-delete makes consumption at-most-once: of two
    /// concurrent attempts with the same token, exactly one observes the
    /// stored artifact. An expired, consumed, or never-issued artifact is
    /// indistinguishable from the caller's side.
    #[instrument(skip_all)]
    pub async fn reset_password(&self, token: &str, new_password: &str) -> Result<()> {
        let email = self
            .signer
            .verify(token, TokenPurpose::PasswordReset)
            .ok_or(AccountError::InvalidRequest)?;

        let stored = self
            .store
            .get_and_delete(&reset_token_key(&email))
            .await
            .ok_or(AccountError::InvalidVerifyCode)?;
        // The decoded token must also be the current live one: an old token
        // with a still-valid signature dies here.
        if stored.trim().is_empty() || stored != token {
            return Err(AccountError::InvalidVerifyCode);
        }

        let account = self
            .db
            .find_by_email_not_deleted(&email)
            .await?
            .ok_or(AccountError::NotFound)?;

        let password_hash = password::hash(new_password).map_err(|_| AccountError::Hash)?;
        self.db.update_password(&account.id, &password_hash).await?;

        info!(account_id = %account.id, "Password reset");
        Ok(())
    }

    /// Fetch an account by id.
    pub async fn account(&self, id: &str) -> Result<AccountProfile> {
        let account = self.db.get_account(id).await.map_err(map_not_found)?;
        let roles = self.db.roles_for_account(&account.id).await?;
        Ok(AccountProfile::from_account(account, roles))
    }

    /// Fetch the non-deleted account for an email.
    ///
    /// The caller's identity arrives as an explicit argument; there is no
    /// ambient "current user" in this crate.
    pub async fn account_by_email(&self, email: &str) -> Result<AccountProfile> {
        let account = self
            .db
            .find_by_email_not_deleted(email)
            .await?
            .ok_or(AccountError::NotFound)?;
        let roles = self.db.roles_for_account(&account.id).await?;
        Ok(AccountProfile::from_account(account, roles))
    }

    /// Update profile fields on an account.
    #[instrument(skip(self, changes))]
    pub async fn modify_account(
        &self,
        id: &str,
        changes: ModifyAccount,
    ) -> Result<AccountProfile> {
        let account = self
            .db
            .update_profile(
                id,
                changes.name.as_deref(),
                changes.biography.as_deref(),
                changes.company.as_deref(),
                changes.location.as_deref(),
                changes.homepage.as_deref(),
            )
            .await
            .map_err(map_not_found)?;
        let roles = self.db.roles_for_account(&account.id).await?;
        Ok(AccountProfile::from_account(account, roles))
    }
}

fn map_not_found(e: DatabaseError) -> AccountError {
    match e {
        DatabaseError::NotFound(_) => AccountError::NotFound,
        other => AccountError::Storage(other),
    }
}

/// Draw a 6-digit verification code, uniform over 100000..=999999.
fn new_verify_code() -> String {
    rand::rng().random_range(100_000..1_000_000).to_string()
}
