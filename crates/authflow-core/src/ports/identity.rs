//! Identity provider port - the federated sign-in SDK.

use async_trait::async_trait;
use secrecy::SecretString;

/// A user signed in to the identity provider.
#[derive(Debug, Clone)]
pub struct IdentityUser {
    pub uid: String,
    pub email: Option<String>,
    pub email_verified: bool,
    id_token: SecretString,
}

impl IdentityUser {
    pub fn new(
        uid: impl Into<String>,
        email: Option<String>,
        email_verified: bool,
        id_token: SecretString,
    ) -> Self {
        Self {
            uid: uid.into(),
            email,
            email_verified,
            id_token,
        }
    }

    /// The ID token issued for this sign-in, to be exchanged with the auth API.
    pub fn id_token(&self) -> &SecretString {
        &self.id_token
    }
}

/// Identity provider trait - popup and password sign-in plus sign-out.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Run the provider's popup sign-in and return the signed-in user.
    async fn sign_in_with_popup(&self) -> Result<IdentityUser, IdentityError>;

    /// Sign in with email and password.
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<IdentityUser, IdentityError>;

    /// Drop the provider's local session.
    async fn sign_out(&self) -> Result<(), IdentityError>;
}

/// Identity provider failure, identified by an `auth/...` error code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message} ({code})")]
pub struct IdentityError {
    pub code: String,
    pub message: String,
}

impl IdentityError {
    pub const POPUP_CLOSED: &'static str = "auth/popup-closed-by-user";
    pub const POPUP_BLOCKED: &'static str = "auth/popup-blocked";
    pub const USER_NOT_FOUND: &'static str = "auth/user-not-found";
    pub const WRONG_PASSWORD: &'static str = "auth/wrong-password";
    pub const INVALID_CREDENTIAL: &'static str = "auth/invalid-credential";
    pub const USER_DISABLED: &'static str = "auth/user-disabled";
    pub const TOO_MANY_REQUESTS: &'static str = "auth/too-many-requests";
    pub const NETWORK: &'static str = "auth/network-request-failed";
    pub const INTERNAL: &'static str = "auth/internal-error";

    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn popup_closed() -> Self {
        Self::new(Self::POPUP_CLOSED, "The popup was closed before sign-in completed")
    }

    pub fn popup_blocked() -> Self {
        Self::new(Self::POPUP_BLOCKED, "The sign-in popup could not be opened")
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(Self::NETWORK, message)
    }

    pub fn kind(&self) -> IdentityErrorKind {
        match self.code.as_str() {
            Self::POPUP_CLOSED => IdentityErrorKind::PopupClosed,
            Self::POPUP_BLOCKED => IdentityErrorKind::PopupBlocked,
            Self::USER_NOT_FOUND | Self::WRONG_PASSWORD | Self::INVALID_CREDENTIAL => {
                IdentityErrorKind::InvalidCredentials
            }
            Self::USER_DISABLED => IdentityErrorKind::UserDisabled,
            Self::TOO_MANY_REQUESTS => IdentityErrorKind::TooManyRequests,
            Self::NETWORK => IdentityErrorKind::Network,
            _ => IdentityErrorKind::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityErrorKind {
    PopupClosed,
    PopupBlocked,
    InvalidCredentials,
    UserDisabled,
    TooManyRequests,
    Network,
    Other,
}
