//! User-facing status text. Every error shown to the user goes through
//! [`FlowError::user_message`].

use crate::error::FlowError;
use crate::ports::{ApiErrorKind, IdentityErrorKind};

pub const REGISTERED: &str =
    "Account created! We sent a verification link to your email. Verify it, then log in.";
pub const LOGGED_IN: &str = "Login successful!";
pub const FEDERATED_LOGGED_IN: &str = "Google login successful!";
pub const VERIFICATION_RESENT: &str = "Verification email sent! Please check your inbox.";
pub const PASSWORD_RESET_REQUESTED: &str =
    "If an account exists for that email, a password reset link has been sent.";
pub const PASSWORD_RESET_CONFIRMED: &str =
    "Password has been reset successfully. Please log in with your new password.";
pub const LOGGED_OUT: &str = "Logged out successfully!";
pub const LOCAL_DATA_CLEARED: &str = "Local data cleared!";
pub const ALREADY_LOGGED_IN: &str = "You are already logged in!";

pub const CANNOT_CONNECT: &str = "Cannot connect to backend server. Please check if it's running.";
pub const EMAIL_EXISTS: &str = "Email already exists. Please try logging in instead.";
pub const WEAK_PASSWORD: &str = "Password is too weak. Please use at least 6 characters.";
pub const INVALID_EMAIL: &str = "Invalid email address.";
pub const INVALID_CREDENTIALS: &str = "Invalid email or password. Please check your credentials.";
pub const USER_NOT_FOUND: &str = "User not found. Please check your email or sign up.";
pub const EMAIL_NOT_VERIFIED: &str =
    "Please verify your email address before logging in. Check your inbox for the link.";
pub const ALREADY_VERIFIED: &str = "This email address is already verified. Please log in.";
pub const INVALID_TOKEN: &str = "Sign-in could not be verified. Please try again.";
pub const SIGN_IN_CANCELLED: &str = "Sign-in was cancelled.";
pub const POPUP_BLOCKED: &str = "Pop-up was blocked. Please allow pop-ups for this site.";
pub const ACCOUNT_DISABLED: &str = "This account has been disabled.";
pub const TOO_MANY_ATTEMPTS: &str = "Too many attempts. Please try again later.";
pub const IDENTITY_UNREACHABLE: &str =
    "Cannot reach the sign-in service. Please check your connection.";
pub const NO_PENDING_EMAIL: &str = "No email found. Please register again.";
pub const BUSY: &str = "Please wait, a previous request is still in progress.";

impl FlowError {
    /// Text to show the user. Unrecognized backend and provider errors are
    /// shown verbatim.
    pub fn user_message(&self) -> String {
        let text = match self {
            FlowError::Api(err) => match err.kind {
                ApiErrorKind::Transport => CANNOT_CONNECT,
                ApiErrorKind::EmailExists => EMAIL_EXISTS,
                ApiErrorKind::WeakPassword => WEAK_PASSWORD,
                ApiErrorKind::InvalidEmail => INVALID_EMAIL,
                ApiErrorKind::InvalidCredentials => INVALID_CREDENTIALS,
                ApiErrorKind::UserNotFound => USER_NOT_FOUND,
                ApiErrorKind::EmailNotVerified => EMAIL_NOT_VERIFIED,
                ApiErrorKind::AlreadyVerified => ALREADY_VERIFIED,
                ApiErrorKind::InvalidToken => INVALID_TOKEN,
                ApiErrorKind::Other => return err.detail.clone(),
            },
            FlowError::Identity(err) => match err.kind() {
                IdentityErrorKind::PopupClosed => SIGN_IN_CANCELLED,
                IdentityErrorKind::PopupBlocked => POPUP_BLOCKED,
                IdentityErrorKind::InvalidCredentials => INVALID_CREDENTIALS,
                IdentityErrorKind::UserDisabled => ACCOUNT_DISABLED,
                IdentityErrorKind::TooManyRequests => TOO_MANY_ATTEMPTS,
                IdentityErrorKind::Network => IDENTITY_UNREACHABLE,
                IdentityErrorKind::Other => return err.message.clone(),
            },
            FlowError::Store(err) => return format!("Could not access local storage: {err}"),
            FlowError::EmailNotVerified => EMAIL_NOT_VERIFIED,
            FlowError::NoPendingEmail => NO_PENDING_EMAIL,
            FlowError::Busy(_) => BUSY,
            FlowError::InvalidTransition { .. } => return self.to_string(),
        };
        text.to_string()
    }
}
