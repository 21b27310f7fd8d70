use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use subtle::ConstantTimeEq;

use super::errors::PasswordError;
use crate::random;

/// Algorithm tag written into the first field of every encoded hash.
pub const ALGORITHM: &str = "pbkdf2_sha256";

/// Field delimiter of the encoded format. Never allowed inside a salt.
pub const DELIMITER: char = '$';

/// Iteration count used when no explicit count is requested.
pub const DEFAULT_ITERATIONS: u32 = 36_000;

/// Derived key length in bytes (SHA-256 output size).
const DERIVED_KEY_LENGTH: usize = 32;

/// Marker prefix for deliberately disabled password hashes.
const UNUSABLE_PREFIX: char = '!';

/// Password hashing implementation.
///
/// Derives keys with PBKDF2-HMAC-SHA256 and encodes them as
/// `pbkdf2_sha256$<iterations>$<salt>$<base64 digest>`. The encoded value is
/// immutable once stored; password changes replace it wholesale.
pub struct PasswordHasher;

impl PasswordHasher {
    /// Create a new password hasher instance.
    pub fn new() -> Self {
        Self
    }

    /// Hash a plaintext password with the given salt and iteration count.
    ///
    /// # Errors
    /// * `EmptyPassword` - plaintext is empty
    /// * `InvalidSalt` - salt is empty or contains the field delimiter
    pub fn hash(
        &self,
        plaintext: &str,
        salt: &str,
        iterations: u32,
    ) -> Result<String, PasswordError> {
        if plaintext.is_empty() {
            return Err(PasswordError::EmptyPassword);
        }
        if salt.is_empty() || salt.contains(DELIMITER) {
            return Err(PasswordError::InvalidSalt);
        }

        let mut derived = [0u8; DERIVED_KEY_LENGTH];
        pbkdf2_hmac::<Sha256>(
            plaintext.as_bytes(),
            salt.as_bytes(),
            iterations,
            &mut derived,
        );
        let digest = BASE64.encode(derived);

        Ok(format!(
            "{ALGORITHM}{DELIMITER}{iterations}{DELIMITER}{salt}{DELIMITER}{digest}"
        ))
    }

    /// Verify a plaintext password against a stored encoded hash.
    ///
    /// Splits on the first three delimiters only, so the digest field can
    /// never be split further, then re-derives and compares the full encoded
    /// strings in constant time.
    ///
    /// # Errors
    /// * `MalformedHash` - encoded value does not have four fields or a
    ///   numeric iteration count
    pub fn verify(&self, plaintext: &str, encoded: &str) -> Result<bool, PasswordError> {
        let mut fields = encoded.splitn(4, DELIMITER);
        let (Some(_algorithm), Some(iterations), Some(salt), Some(_digest)) =
            (fields.next(), fields.next(), fields.next(), fields.next())
        else {
            return Err(PasswordError::MalformedHash);
        };
        let iterations: u32 = iterations
            .parse()
            .map_err(|_| PasswordError::MalformedHash)?;

        let candidate = self.hash(plaintext, salt, iterations)?;
        Ok(bool::from(candidate.as_bytes().ct_eq(encoded.as_bytes())))
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

/// Hash a password for storage, with a freshly generated random salt.
pub fn make_password(plaintext: &str) -> Result<String, PasswordError> {
    PasswordHasher::new().hash(plaintext, &random::default_salt(), DEFAULT_ITERATIONS)
}

/// Whether an encoded hash can take part in verification.
///
/// Only the disabled-marker (leading `!`) is unusable. An absent hash counts
/// as usable; it falls through to a comparison that simply fails.
pub fn is_hash_usable(encoded: Option<&str>) -> bool {
    encoded.map_or(true, |e| !e.starts_with(UNUSABLE_PREFIX))
}

/// Check a plaintext password against a stored hash.
///
/// Returns false for an absent plaintext, an unusable hash, an absent
/// encoded value, or any verification failure. Never panics.
pub fn check_password(plaintext: Option<&str>, encoded: Option<&str>) -> bool {
    let Some(plaintext) = plaintext else {
        return false;
    };
    if !is_hash_usable(encoded) {
        return false;
    }
    match encoded {
        Some(encoded) => PasswordHasher::new()
            .verify(plaintext, encoded)
            .unwrap_or(false),
        None => false,
    }
}
