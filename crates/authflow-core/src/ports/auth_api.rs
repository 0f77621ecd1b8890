//! Auth API port - the remote service that issues session tokens.

use async_trait::async_trait;
use secrecy::SecretString;

use crate::domain::Session;

/// Auth API trait - abstraction over the backend's `/api/auth/*` endpoints.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Create an email/password account. The account stays unverified until
    /// the user follows the emailed link.
    async fn register(
        &self,
        display_name: &str,
        email: &str,
        password: &SecretString,
    ) -> Result<(), ApiError>;

    /// Exchange email and password for a session.
    async fn login(&self, email: &str, password: &SecretString) -> Result<Session, ApiError>;

    /// Exchange an identity provider ID token for a session.
    async fn login_with_id_token(&self, id_token: &SecretString) -> Result<Session, ApiError>;

    /// Send another verification email.
    async fn resend_verification(&self, email: &str) -> Result<(), ApiError>;

    /// Ask for a password reset email.
    async fn request_password_reset(&self, email: &str) -> Result<(), ApiError>;

    /// Set a new password using the out-of-band code from the reset email.
    async fn confirm_password_reset(
        &self,
        oob_code: &str,
        new_password: &SecretString,
    ) -> Result<(), ApiError>;

    /// Check that the backend answers at all.
    async fn ping(&self) -> Result<(), ApiError>;
}

/// What went wrong, independent of the backend's wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// The request never got an HTTP response.
    Transport,
    EmailExists,
    WeakPassword,
    InvalidEmail,
    InvalidCredentials,
    UserNotFound,
    EmailNotVerified,
    AlreadyVerified,
    InvalidToken,
    Other,
}

impl ApiErrorKind {
    /// Map a machine-readable error tag to a kind.
    pub fn from_code(code: &str) -> Option<Self> {
        let kind = match code.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "email_exists" | "email_already_exists" => ApiErrorKind::EmailExists,
            "weak_password" => ApiErrorKind::WeakPassword,
            "invalid_email" => ApiErrorKind::InvalidEmail,
            "invalid_credentials" => ApiErrorKind::InvalidCredentials,
            "user_not_found" => ApiErrorKind::UserNotFound,
            "email_not_verified" => ApiErrorKind::EmailNotVerified,
            "email_already_verified" => ApiErrorKind::AlreadyVerified,
            "invalid_token" | "invalid_id_token" => ApiErrorKind::InvalidToken,
            _ => return None,
        };
        Some(kind)
    }

    /// Classify an error response. A known `code` tag wins; otherwise the
    /// status and the `detail` text decide.
    pub fn classify(status: u16, code: Option<&str>, detail: &str) -> Self {
        if let Some(kind) = code.and_then(Self::from_code) {
            return kind;
        }

        let detail = detail.to_lowercase();
        let has = |needle: &str| detail.contains(needle);

        // "invalid email or password" must be checked before "invalid email".
        if has("already exists") {
            ApiErrorKind::EmailExists
        } else if has("weak password") || has("weak-password") || has("weak_password") {
            ApiErrorKind::WeakPassword
        } else if has("invalid email or password") {
            ApiErrorKind::InvalidCredentials
        } else if has("invalid email")
            || has("invalid-email")
            || has("invalid_email")
            || has("email validation failed")
        {
            ApiErrorKind::InvalidEmail
        } else if has("user not found") {
            ApiErrorKind::UserNotFound
        } else if has("already verified") {
            ApiErrorKind::AlreadyVerified
        } else if has("verify your email") || (status == 403 && has("verif")) {
            ApiErrorKind::EmailNotVerified
        } else if has("invalid id token") || has("token verification failed") {
            ApiErrorKind::InvalidToken
        } else {
            ApiErrorKind::Other
        }
    }
}

/// Auth API failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{detail}")]
pub struct ApiError {
    pub kind: ApiErrorKind,
    /// HTTP status, absent for transport failures.
    pub status: Option<u16>,
    /// The backend's message, or a description of the transport failure.
    pub detail: String,
}

impl ApiError {
    pub fn transport(detail: impl Into<String>) -> Self {
        Self {
            kind: ApiErrorKind::Transport,
            status: None,
            detail: detail.into(),
        }
    }

    pub fn from_response(status: u16, code: Option<&str>, detail: impl Into<String>) -> Self {
        let detail = detail.into();
        Self {
            kind: ApiErrorKind::classify(status, code, &detail),
            status: Some(status),
            detail,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_takes_precedence_over_detail() {
        let kind = ApiErrorKind::classify(400, Some("weak-password"), "Email already exists");
        assert_eq!(kind, ApiErrorKind::WeakPassword);
    }

    #[test]
    fn test_unknown_code_falls_back_to_detail() {
        let kind = ApiErrorKind::classify(400, Some("E1234"), "Email already exists");
        assert_eq!(kind, ApiErrorKind::EmailExists);
    }

    #[test]
    fn test_backend_register_messages() {
        assert_eq!(
            ApiErrorKind::classify(
                400,
                None,
                "Failed to register user: 400: Email already exists"
            ),
            ApiErrorKind::EmailExists
        );
        assert_eq!(
            ApiErrorKind::classify(
                400,
                None,
                "Failed to create user: WEAK_PASSWORD : Password should be at least 6 characters"
            ),
            ApiErrorKind::WeakPassword
        );
        assert_eq!(
            ApiErrorKind::classify(400, None, "Email validation failed: domain has no MX record"),
            ApiErrorKind::InvalidEmail
        );
    }

    #[test]
    fn test_backend_login_messages() {
        assert_eq!(
            ApiErrorKind::classify(401, None, "Invalid email or password"),
            ApiErrorKind::InvalidCredentials
        );
        assert_eq!(ApiErrorKind::classify(404, None, "User not found"), ApiErrorKind::UserNotFound);
        assert_eq!(
            ApiErrorKind::classify(
                403,
                None,
                "Please verify your email address before logging in"
            ),
            ApiErrorKind::EmailNotVerified
        );
        assert_eq!(
            ApiErrorKind::classify(400, None, "Email is already verified"),
            ApiErrorKind::AlreadyVerified
        );
        assert_eq!(
            ApiErrorKind::classify(401, None, "Invalid ID token"),
            ApiErrorKind::InvalidToken
        );
    }

    #[test]
    fn test_unrecognized_detail_is_other() {
        let err = ApiError::from_response(500, None, "HTTP 500: Internal Server Error");
        assert_eq!(err.kind, ApiErrorKind::Other);
        assert_eq!(err.status, Some(500));
        assert_eq!(err.to_string(), "HTTP 500: Internal Server Error");
    }
}
