use std::fmt;

use jsonwebtoken::Algorithm;
use serde::Serialize;

use crate::jwt::Claims;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::jwt::TokenPurpose;
use crate::password;
use crate::password::PasswordError;

/// Authentication coordinator combining password verification and token
/// issuance.
///
/// Holds the process-wide token configuration (secret, algorithm, access
/// token lifetime) injected once at startup. Login policy - which user,
/// which lookups, which failures are indistinguishable - belongs to the
/// calling service.
pub struct Authenticator {
    jwt_handler: JwtHandler,
    access_token_expire_seconds: i64,
}

// Hand-written so the signing keys never reach log output.
impl fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Authenticator")
            .field("jwt_handler", &"<redacted>")
            .field(
                "access_token_expire_seconds",
                &self.access_token_expire_seconds,
            )
            .finish()
    }
}

/// Result of successful authentication, shaped for the login response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthenticationResult {
    /// Always `"bearer"`
    pub token_type: String,

    /// Signed access token
    pub access_token: String,
}

impl Authenticator {
    /// Create a new authenticator.
    ///
    /// # Arguments
    /// * `secret` - Secret key for token signing
    /// * `algorithm` - HMAC signing algorithm
    /// * `access_token_expire_seconds` - Access token lifetime
    pub fn new(secret: &[u8], algorithm: Algorithm, access_token_expire_seconds: i64) -> Self {
        Self {
            jwt_handler: JwtHandler::new(secret, algorithm),
            access_token_expire_seconds,
        }
    }

    /// Hash a password for storage with a fresh random salt.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed
    pub fn hash_password(&self, plaintext: &str) -> Result<String, PasswordError> {
        password::make_password(plaintext)
    }

    /// Check a plaintext password against a stored hash.
    ///
    /// Absent values and unusable hashes fail closed; comparison is
    /// constant-time.
    pub fn verify_password(&self, plaintext: Option<&str>, stored_hash: Option<&str>) -> bool {
        password::check_password(plaintext, stored_hash)
    }

    /// Issue a signed token for a user and purpose.
    ///
    /// # Errors
    /// * `JwtError` - Token encoding failed
    pub fn issue_token(
        &self,
        user_id: i64,
        purpose: TokenPurpose,
    ) -> Result<AuthenticationResult, JwtError> {
        let claims = Claims::for_user(user_id, purpose, self.access_token_expire_seconds);
        let access_token = self.jwt_handler.encode(&claims)?;

        Ok(AuthenticationResult {
            token_type: "bearer".to_string(),
            access_token,
        })
    }

    /// Validate a presented token and return its claim set.
    ///
    /// # Errors
    /// * `JwtError` - Token validation or decoding failed
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        self.jwt_handler.decode(token)
    }
}
