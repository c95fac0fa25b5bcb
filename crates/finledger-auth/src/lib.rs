//! finledger auth — password hashing, bearer token
//! issuance/verification, and the authentication service.

pub mod config;
pub mod error;
pub mod password;
pub mod service;
pub mod token;

pub use config::AuthConfig;
pub use error::AuthError;
pub use service::{AuthService, RegisterInput, Token};
pub use token::Identity;
