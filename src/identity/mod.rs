//! Identity - Authentication seam for the external identity provider.
//!
//! The core treats the authenticated account identifier as an opaque
//! partition key for all data. Failures are classified into a small fixed
//! set of user-facing categories; everything else collapses to
//! [`AuthError::Unexpected`].

mod in_memory;
mod provider;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque partition key identifying one authenticated account.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountId(String);

impl AccountId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AccountId {
    fn from(id: &str) -> Self {
        AccountId(id.to_string())
    }
}

impl From<String> for AccountId {
    fn from(id: String) -> Self {
        AccountId(id)
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An authenticated session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub account: AccountId,
    pub email: String,
}

/// Identity failure categories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    InvalidEmail,
    InvalidCredentials,
    EmailTaken,
    WeakPassword,
    /// Everything that does not fit a known category.
    Unexpected(String),
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::InvalidEmail => write!(f, "please enter a valid email address"),
            AuthError::InvalidCredentials => write!(f, "invalid email or password"),
            AuthError::EmailTaken => write!(f, "an account with this email already exists"),
            AuthError::WeakPassword => {
                write!(f, "password should be at least {} characters", MIN_PASSWORD_LEN)
            }
            AuthError::Unexpected(msg) => write!(f, "unexpected auth error: {}", msg),
        }
    }
}

impl std::error::Error for AuthError {}

/// Minimum accepted password length.
pub const MIN_PASSWORD_LEN: usize = 6;

pub use in_memory::InMemoryIdentity;
pub use provider::IdentityProvider;
