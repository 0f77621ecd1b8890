use async_trait::async_trait;
use secrecy::SecretString;

use authflow_core::ports::IdentityError;

/// Interactive step of a federated sign-in.
///
/// Obtains a Google ID token from the user, however the front end chooses to
/// do it. `Ok(None)` means the user dismissed the prompt.
#[async_trait]
pub trait PopupHandler: Send + Sync {
    async fn google_credential(&self) -> Result<Option<SecretString>, IdentityError>;
}
