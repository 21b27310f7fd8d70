use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::errors::JwtError;

/// JWT token handler for encoding and decoding tokens.
///
/// Generic over the claims type. Secret and signing algorithm come from
/// process configuration, injected once at construction and immutable for
/// the process lifetime.
pub struct JwtHandler {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
}

impl JwtHandler {
    /// Create a new JWT handler with a secret key and HMAC algorithm.
    ///
    /// # Security Notes
    /// - The secret should be at least 256 bits (32 bytes) for HS256
    /// - Store secrets in environment variables or secure vaults, never in code
    pub fn new(secret: &[u8], algorithm: Algorithm) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm,
        }
    }

    /// Sign a claim set into a JWT token string.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn encode<T: Serialize>(&self, claims: &T) -> Result<String, JwtError> {
        let header = Header::new(self.algorithm);

        encode(&header, claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }

    /// Decode and validate a JWT token.
    ///
    /// Verifies the signature and, when the token carries an `exp` claim,
    /// its expiry. Tokens without an `exp` claim are accepted.
    ///
    /// # Errors
    /// * `TokenExpired` - the expiry claim is in the past
    /// * `DecodingFailed` - malformed token or invalid signature
    pub fn decode<T: DeserializeOwned>(&self, token: &str) -> Result<T, JwtError> {
        let mut validation = Validation::new(self.algorithm);
        validation.required_spec_claims.clear();

        let token_data =
            decode::<T>(token, &self.decoding_key, &validation).map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::TokenExpired,
                _ => JwtError::DecodingFailed(e.to_string()),
            })?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwt::claims::Claims;
    use crate::jwt::claims::TokenPurpose;

    const SECRET: &[u8] = b"my_secret_key_at_least_32_bytes_long!";

    #[test]
    fn test_encode_and_decode_without_expiry() {
        let handler = JwtHandler::new(SECRET, Algorithm::HS256);
        let claims = Claims {
            token_type: TokenPurpose::Access,
            user_id: 123,
            exp: None,
        };

        let token = handler.encode(&claims).expect("Failed to encode token");
        let decoded: Claims = handler.decode(&token).expect("Failed to decode token");

        assert_eq!(decoded, claims);
    }

    #[test]
    fn test_encode_and_decode_with_future_expiry() {
        let handler = JwtHandler::new(SECRET, Algorithm::HS256);
        let claims = Claims::for_user(123, TokenPurpose::Access, 3600);

        let token = handler.encode(&claims).expect("Failed to encode token");
        let decoded: Claims = handler.decode(&token).expect("Failed to decode token");

        assert_eq!(decoded, claims);
    }

    #[test]
    fn test_expired_token_is_distinct_from_malformed() {
        let handler = JwtHandler::new(SECRET, Algorithm::HS256);
        // Past the default validation leeway.
        let claims = Claims::for_user(123, TokenPurpose::Access, -3600);

        let token = handler.encode(&claims).expect("Failed to encode token");

        assert_eq!(
            handler.decode::<Claims>(&token),
            Err(JwtError::TokenExpired)
        );
        assert!(matches!(
            handler.decode::<Claims>("invalid.token.here"),
            Err(JwtError::DecodingFailed(_))
        ));
    }

    #[test]
    fn test_decode_with_wrong_secret() {
        let handler1 = JwtHandler::new(b"secret1_at_least_32_bytes_long_key!", Algorithm::HS256);
        let handler2 = JwtHandler::new(b"secret2_at_least_32_bytes_long_key!", Algorithm::HS256);

        let claims = Claims::for_user(123, TokenPurpose::Access, 3600);
        let token = handler1.encode(&claims).expect("Failed to encode token");

        assert!(matches!(
            handler2.decode::<Claims>(&token),
            Err(JwtError::DecodingFailed(_))
        ));
    }
}
