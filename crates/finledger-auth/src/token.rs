//! Signed bearer token issuance and verification.
//!
//! Tokens are compact, self-contained JWTs carrying the user's identity
//! claims. Verification is purely stateless — a signature check plus
//! clock comparison, never a store round-trip. There is no revocation
//! list: possession of a structurally valid, unexpired, correctly
//! signed token is sufficient for authentication.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use finledger_core::models::user::User;

use crate::config::AuthConfig;
use crate::error::AuthError;

/// Identity embedded in every session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: i64,
    pub username: String,
    pub email: String,
}

impl From<&User> for Identity {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
        }
    }
}

/// Full claim set of a session token.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject — user id, stringified.
    pub sub: String,
    /// Issued-at (Unix timestamp).
    pub iat: i64,
    /// Not-before (Unix timestamp).
    pub nbf: i64,
    /// Expiration (Unix timestamp).
    pub exp: i64,
    /// Embedded identity record.
    pub user: Identity,
}

/// Issue a signed token for `identity`, valid from `now` for the
/// configured lifetime.
pub fn issue_token(
    identity: &Identity,
    config: &AuthConfig,
    now: DateTime<Utc>,
) -> Result<String, AuthError> {
    let iat = now.timestamp();
    let exp = (now + Duration::seconds(config.token_lifetime_secs as i64)).timestamp();

    let claims = TokenClaims {
        sub: identity.id.to_string(),
        iat,
        nbf: iat,
        exp,
        user: identity.clone(),
    };

    let key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
    let header = Header::new(config.jwt_algorithm);

    jsonwebtoken::encode(&header, &claims, &key)
        .map_err(|e| AuthError::Crypto(format!("token encode: {e}")))
}

/// Decode and verify a token, returning the embedded identity.
///
/// Every failure mode — bad signature, malformed structure, expired,
/// not yet valid, or an identity that does not satisfy the schema —
/// collapses into [`AuthError::InvalidToken`] so the caller cannot tell
/// which check failed.
pub fn decode_token(token: &str, config: &AuthConfig) -> Result<Identity, AuthError> {
    let key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

    let mut validation = Validation::new(config.jwt_algorithm);
    validation.validate_nbf = true;
    validation.leeway = 0;
    validation.set_required_spec_claims(&["sub", "exp", "nbf"]);

    jsonwebtoken::decode::<TokenClaims>(token, &key, &validation)
        .map(|data| data.claims.user)
        .map_err(|_| AuthError::InvalidToken)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> AuthConfig {
        AuthConfig {
            jwt_secret: "test-signing-secret".into(),
            ..AuthConfig::default()
        }
    }

    fn alice() -> Identity {
        Identity {
            id: 1,
            username: "alice".into(),
            email: "alice@x.com".into(),
        }
    }

    #[test]
    fn token_roundtrip() {
        let config = test_config();
        let token = issue_token(&alice(), &config, Utc::now()).unwrap();
        let identity = decode_token(&token, &config).unwrap();
        assert_eq!(identity, alice());
    }

    #[test]
    fn expired_token_fails() {
        let config = test_config();
        // Issued two hours ago with a one-hour lifetime.
        let issued_at = Utc::now() - Duration::hours(2);
        let token = issue_token(&alice(), &config, issued_at).unwrap();
        assert!(decode_token(&token, &config).is_err());
    }

    #[test]
    fn not_yet_valid_token_fails() {
        let config = test_config();
        let token = issue_token(&alice(), &config, Utc::now() + Duration::hours(1)).unwrap();
        assert!(decode_token(&token, &config).is_err());
    }

    #[test]
    fn tampered_signature_fails() {
        let config = test_config();
        let token = issue_token(&alice(), &config, Utc::now()).unwrap();

        let (rest, sig) = token.rsplit_once('.').unwrap();
        // Flip the last signature character to a different base64url one.
        let flipped = if sig.ends_with('A') { "B" } else { "A" };
        let tampered = format!("{rest}.{}{flipped}", &sig[..sig.len() - 1]);

        assert!(decode_token(&tampered, &config).is_err());
    }

    #[test]
    fn wrong_secret_fails() {
        let config = test_config();
        let token = issue_token(&alice(), &config, Utc::now()).unwrap();

        let other = AuthConfig {
            jwt_secret: "another-secret".into(),
            ..AuthConfig::default()
        };
        assert!(decode_token(&token, &other).is_err());
    }

    #[test]
    fn structurally_malformed_token_fails() {
        let config = test_config();
        assert!(decode_token("not-a-token", &config).is_err());
        assert!(decode_token("", &config).is_err());
    }

    #[test]
    fn identity_schema_mismatch_fails() {
        // A correctly signed token whose `user` claim is missing a
        // required field must be rejected just like a bad signature.
        #[derive(Serialize)]
        struct PartialUser {
            id: i64,
            username: String,
        }

        #[derive(Serialize)]
        struct PartialClaims {
            sub: String,
            iat: i64,
            nbf: i64,
            exp: i64,
            user: PartialUser,
        }

        let config = test_config();
        let now = Utc::now().timestamp();
        let claims = PartialClaims {
            sub: "1".into(),
            iat: now,
            nbf: now,
            exp: now + 3600,
            user: PartialUser {
                id: 1,
                username: "alice".into(),
            },
        };

        let token = jsonwebtoken::encode(
            &Header::new(config.jwt_algorithm),
            &claims,
            &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
        )
        .unwrap();

        assert!(matches!(
            decode_token(&token, &config),
            Err(AuthError::InvalidToken)
        ));
    }
}
