//! Explicit authentication context.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ids::UserId;

/// User id and bearer token for the Remote Resource Gateway.
///
/// Every evaluation receives one of these instead of reading ambient
/// session storage.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    pub user_id: UserId,
    pub auth_token: String,
}

impl AuthContext {
    pub fn new(user_id: impl Into<UserId>, auth_token: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            auth_token: auth_token.into(),
        }
    }

    /// An empty context; evaluations against it return the baseline state.
    pub fn anonymous() -> Self {
        Self::new(UserId::new(""), "")
    }

    /// Both the user id and the token are non-blank.
    pub fn is_complete(&self) -> bool {
        !self.user_id.is_blank() && !self.auth_token.trim().is_empty()
    }

    /// Token with everything but the last four characters masked.
    pub fn redacted_token(&self) -> String {
        let chars: Vec<char> = self.auth_token.chars().collect();
        if chars.len() <= 4 {
            return "****".to_string();
        }
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("****{}", tail)
    }
}

impl fmt::Debug for AuthContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthContext")
            .field("user_id", &self.user_id)
            .field("auth_token", &self.redacted_token())
            .finish()
    }
}
