use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Recognized token purposes.
///
/// Only access tokens exist today. The enum stays open for a refresh purpose
/// that would carry no expiry claim; unrecognized purposes are
/// unrepresentable by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenPurpose {
    Access,
}

/// Claim set embedded in a signed token.
///
/// Built once per issuance, serialized immediately and discarded; tokens are
/// never stored server-side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Token purpose
    pub token_type: TokenPurpose,

    /// Subject user identifier
    pub user_id: i64,

    /// Expiration time (Unix timestamp); only access tokens carry one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

impl Claims {
    /// Build the claim set for a user and purpose.
    ///
    /// Access-purpose tokens expire `access_expire_seconds` from now; any
    /// future purpose without an expiry rule would leave `exp` unset.
    pub fn for_user(user_id: i64, purpose: TokenPurpose, access_expire_seconds: i64) -> Self {
        let exp = match purpose {
            TokenPurpose::Access => {
                Some((Utc::now() + Duration::seconds(access_expire_seconds)).timestamp())
            }
        };

        Self {
            token_type: purpose,
            user_id,
            exp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_claims_carry_expiry() {
        let claims = Claims::for_user(42, TokenPurpose::Access, 3600);

        assert_eq!(claims.token_type, TokenPurpose::Access);
        assert_eq!(claims.user_id, 42);

        let exp = claims.exp.expect("access token must carry an expiry");
        let now = Utc::now().timestamp();
        assert!(exp > now + 3590 && exp <= now + 3610);
    }

    #[test]
    fn test_purpose_serializes_as_access() {
        let claims = Claims::for_user(1, TokenPurpose::Access, 60);
        let value = serde_json::to_value(&claims).unwrap();
        assert_eq!(value["token_type"], "access");
        assert_eq!(value["user_id"], 1);
    }

    #[test]
    fn test_missing_exp_deserializes_to_none() {
        let claims: Claims =
            serde_json::from_str(r#"{"token_type":"access","user_id":7}"#).unwrap();
        assert_eq!(claims.exp, None);
    }
}
