//! Signed token issuance and verification.

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};

use super::claims::{Claims, TokenPurpose};

/// Issues and verifies the signed tokens that mediate account registration
/// and password reset.
///
/// Register tokens are long-lived (the invitation link must survive a day);
/// reset tokens expire together with their store-side artifact.
#[derive(Clone)]
pub struct TokenSigner {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    register_ttl_secs: i64,
    reset_ttl_secs: i64,
}

impl TokenSigner {
    /// Create a new `TokenSigner` with the given secret.
    pub fn new(secret: &[u8], register_ttl_secs: i64, reset_ttl_secs: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            register_ttl_secs,
            reset_ttl_secs,
        }
    }

    /// Issue a register token for the given email.
    pub fn issue_register_token(
        &self,
        email: &str,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        self.issue(email, TokenPurpose::Register, self.register_ttl_secs)
    }

    /// Issue a password-reset token for the given email.
    pub fn issue_reset_token(&self, email: &str) -> Result<String, jsonwebtoken::errors::Error> {
        self.issue(email, TokenPurpose::PasswordReset, self.reset_ttl_secs)
    }

    fn issue(
        &self,
        email: &str,
        purpose: TokenPurpose,
        ttl_secs: i64,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let now = now_secs();

        let claims = Claims {
            jti: uuid::Uuid::new_v4().to_string(),
            sub: email.to_string(),
            purpose: purpose.as_str().to_string(),
            iat: now,
            exp: now + ttl_secs,
        };

        jsonwebtoken::encode(&Header::default(), &claims, &self.encoding_key)
    }

    /// Verify a token for the expected purpose and return its subject email.
    ///
    /// Returns `None` on bad signature, expiry, or purpose mismatch; the
    /// caller cannot tell which, and neither can its caller.
    pub fn verify(&self, token: &str, expected: TokenPurpose) -> Option<String> {
        let data =
            jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &Validation::default())
                .ok()?;

        if data.claims.purpose != expected.as_str() {
            return None;
        }
        Some(data.claims.sub)
    }
}

fn now_secs() -> i64 {
    #[allow(clippy::cast_possible_wrap)]
    let secs = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64;
    secs
}

#[cfg(test)]
#[allow(clippy::panic, clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    fn test_signer() -> TokenSigner {
        TokenSigner::new(b"test-secret-key-for-testing", 86_400, 180)
    }

    #[test]
    fn issue_and_verify_register_token() {
        let signer = test_signer();
        let token = signer.issue_register_token("alice@example.com").unwrap();

        let subject = signer.verify(&token, TokenPurpose::Register).unwrap();
        assert_eq!(subject, "alice@example.com");
    }

    #[test]
    fn issue_and_verify_reset_token() {
        let signer = test_signer();
        let token = signer.issue_reset_token("alice@example.com").unwrap();

        let subject = signer.verify(&token, TokenPurpose::PasswordReset).unwrap();
        assert_eq!(subject, "alice@example.com");
    }

    #[test]
    fn purpose_mismatch_fails_verification() {
        let signer = test_signer();
        let register = signer.issue_register_token("alice@example.com").unwrap();
        let reset = signer.issue_reset_token("alice@example.com").unwrap();

        assert!(signer.verify(&register, TokenPurpose::PasswordReset).is_none());
        assert!(signer.verify(&reset, TokenPurpose::Register).is_none());
    }

    #[test]
    fn garbage_token_fails_verification() {
        let signer = test_signer();
        assert!(signer.verify("not-a-valid-token", TokenPurpose::Register).is_none());
    }

    #[test]
    fn wrong_secret_fails_verification() {
        let signer1 = test_signer();
        let signer2 = TokenSigner::new(b"different-secret", 86_400, 180);

        let token = signer1.issue_register_token("alice@example.com").unwrap();
        assert!(signer2.verify(&token, TokenPurpose::Register).is_none());
    }

    #[test]
    fn expired_token_fails_verification() {
        let signer = test_signer();
        let now = now_secs();
        // Expired well past the default validation leeway.
        let claims = Claims {
            jti: "t1".into(),
            sub: "alice@example.com".into(),
            purpose: TokenPurpose::PasswordReset.as_str().into(),
            iat: now - 600,
            exp: now - 300,
        };
        let token = jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"test-secret-key-for-testing"),
        )
        .unwrap();

        assert!(signer.verify(&token, TokenPurpose::PasswordReset).is_none());
    }

    #[test]
    fn claims_purpose_helpers() {
        let signer = test_signer();
        let token = signer.issue_register_token("a@x.com").unwrap();
        let data = jsonwebtoken::decode::<Claims>(
            &token,
            &DecodingKey::from_secret(b"test-secret-key-for-testing"),
            &Validation::default(),
        )
        .unwrap();

        assert!(data.claims.is_register());
        assert!(!data.claims.is_password_reset());
    }
}
