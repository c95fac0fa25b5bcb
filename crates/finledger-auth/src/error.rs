//! Authentication error types.

use finledger_core::error::LedgerError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("invalid token")]
    InvalidToken,

    #[error("cryptography error: {0}")]
    Crypto(String),
}

/// Boundary classification: every credential or token failure collapses
/// into the single `Unauthorized` outcome, so callers cannot tell which
/// underlying check failed.
impl From<AuthError> for LedgerError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials | AuthError::InvalidToken => LedgerError::Unauthorized,
            AuthError::Crypto(msg) => LedgerError::Crypto(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credential_and_token_failures_collapse_to_unauthorized() {
        assert!(matches!(
            LedgerError::from(AuthError::InvalidCredentials),
            LedgerError::Unauthorized
        ));
        assert!(matches!(
            LedgerError::from(AuthError::InvalidToken),
            LedgerError::Unauthorized
        ));
    }

    #[test]
    fn crypto_errors_stay_distinct() {
        assert!(matches!(
            LedgerError::from(AuthError::Crypto("bad params".into())),
            LedgerError::Crypto(_)
        ));
    }
}
