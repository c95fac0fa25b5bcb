//! Authentication configuration.

use jsonwebtoken::Algorithm;

/// Immutable configuration handed to the auth service and token codec
/// at construction time. Read-only after startup.
#[derive(Clone)]
pub struct AuthConfig {
    /// HMAC signing secret. Externally supplied; never logged and never
    /// embedded in tokens.
    pub jwt_secret: String,
    /// Signing algorithm (HMAC family; default HS256).
    pub jwt_algorithm: Algorithm,
    /// Token lifetime in seconds (default: 3600 = 1 hour).
    pub token_lifetime_secs: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            jwt_algorithm: Algorithm::HS256,
            token_lifetime_secs: 3600,
        }
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("jwt_algorithm", &self.jwt_algorithm)
            .field("token_lifetime_secs", &self.token_lifetime_secs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_redacts_secret() {
        let config = AuthConfig {
            jwt_secret: "top-secret".into(),
            ..AuthConfig::default()
        };
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("top-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
