use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Session entity - the access token and user record issued by the auth API.
///
/// The user record is kept opaque; `profile` offers a typed view for display.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub user: Value,
}

impl Session {
    pub fn new(access_token: impl Into<String>, user: Value) -> Self {
        Self {
            access_token: access_token.into(),
            user,
        }
    }

    /// Decode the user record into a profile, if it has the expected shape.
    pub fn profile(&self) -> Option<UserProfile> {
        serde_json::from_value(self.user.clone()).ok()
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &"[redacted]")
            .field("user", &self.user)
            .finish()
    }
}

/// Public fields of the user record returned alongside an access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub email: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub auth_provider: Option<String>,
    #[serde(default)]
    pub is_email_verified: bool,
}

impl UserProfile {
    /// Name to greet the user with, falling back to the email address.
    pub fn greeting_name(&self) -> &str {
        self.display_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(&self.email)
    }
}
