//! Session Entity
//!
//! The authenticated user plus the bearer token issued at login.

use serde::{Deserialize, Serialize};

use super::entity::null_as_default;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub username: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
}

impl AuthUser {
    /// Username, falling back to the email address
    pub fn display_name(&self) -> &str {
        if self.username.is_empty() {
            &self.email
        } else {
            &self.username
        }
    }
}

/// Login result as returned by `POST /auth/local`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub jwt: String,
    pub user: AuthUser,
}

impl Session {
    pub fn new(jwt: &str, user: AuthUser) -> Self {
        Self {
            jwt: jwt.to_string(),
            user,
        }
    }
}

/// Session as handed to the UI; the token stays on the Rust side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionInfo {
    pub user: AuthUser,
    pub display_name: String,
}

impl From<&Session> for SessionInfo {
    fn from(session: &Session) -> Self {
        Self {
            display_name: session.user.display_name().to_string(),
            user: session.user.clone(),
        }
    }
}
