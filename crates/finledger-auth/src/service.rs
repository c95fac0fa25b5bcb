//! Authentication service — registration, login, and token-to-identity
//! resolution.

use finledger_core::clock::{Clock, SystemClock};
use finledger_core::error::{LedgerError, LedgerResult};
use finledger_core::models::user::CreateUser;
use finledger_core::repository::UserRepository;
use serde::Serialize;
use tracing::debug;

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::password;
use crate::token::{self, Identity};

/// Input for the registration flow.
#[derive(Debug)]
pub struct RegisterInput {
    pub email: String,
    pub username: String,
    pub password: String,
}

/// A freshly issued bearer token.
#[derive(Debug, Clone, Serialize)]
pub struct Token {
    pub access_token: String,
    pub token_type: &'static str,
}

impl Token {
    fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer",
        }
    }
}

/// Authentication service.
///
/// Generic over the user repository so the auth layer has no dependency
/// on the database crate, and over the clock so token timestamps are
/// deterministic in tests.
pub struct AuthService<U: UserRepository, C: Clock = SystemClock> {
    users: U,
    config: AuthConfig,
    clock: C,
}

impl<U: UserRepository> AuthService<U> {
    pub fn new(users: U, config: AuthConfig) -> Self {
        Self::with_clock(users, config, SystemClock)
    }
}

impl<U: UserRepository, C: Clock> AuthService<U, C> {
    pub fn with_clock(users: U, config: AuthConfig, clock: C) -> Self {
        Self {
            users,
            config,
            clock,
        }
    }

    /// Register a new user and issue a token for the fresh identity.
    ///
    /// Fails with `Conflict` if the email or username already exists
    /// (enforced by the store's uniqueness constraints).
    pub async fn register(&self, input: RegisterInput) -> LedgerResult<Token> {
        let password_hash = password::hash_password(&input.password)?;

        let user = self
            .users
            .insert(CreateUser {
                email: input.email,
                username: input.username,
                password_hash,
            })
            .await?;

        debug!(user_id = user.id, "registered new user");

        let token = token::issue_token(&Identity::from(&user), &self.config, self.clock.now())?;
        Ok(Token::bearer(token))
    }

    /// Authenticate with username + password and issue a token.
    ///
    /// An unknown username and a wrong password are indistinguishable:
    /// both surface as `Unauthorized`, which keeps usernames from being
    /// enumerated through the login path.
    pub async fn authenticate(&self, username: &str, password: &str) -> LedgerResult<Token> {
        let user = match self.users.get_by_username(username).await {
            Ok(user) => user,
            Err(LedgerError::NotFound { .. }) => {
                debug!(username, "login attempt for unknown user");
                return Err(AuthError::InvalidCredentials.into());
            }
            Err(e) => return Err(e),
        };

        if !password::verify_password(password, &user.password_hash) {
            debug!(user_id = user.id, "password verification failed");
            return Err(AuthError::InvalidCredentials.into());
        }

        let token = token::issue_token(&Identity::from(&user), &self.config, self.clock.now())?;
        Ok(Token::bearer(token))
    }

    /// Resolve a bearer token into the identity it carries.
    ///
    /// The signature is the sole source of trust: the identity is not
    /// re-checked against the store, so a user removed after issuance
    /// stays valid until the token expires. Any decode failure is
    /// `Unauthorized`.
    pub fn resolve_identity(&self, token: &str) -> LedgerResult<Identity> {
        token::decode_token(token, &self.config).map_err(LedgerError::from)
    }
}
