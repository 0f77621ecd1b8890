//! Terminal stand-in for the provider's sign-in popup.

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use secrecy::SecretString;
use tokio::sync::oneshot;

use authflow_core::ports::IdentityError;
use authflow_infra::PopupHandler;

/// Asks the user to paste a Google ID token.
///
/// The console owns stdin, so the answer arrives through [`TerminalPopup::offer`]
/// rather than a read of its own.
#[derive(Default)]
pub struct TerminalPopup {
    pending: Mutex<Option<oneshot::Sender<String>>>,
}

impl TerminalPopup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand `line` to the open prompt. Returns the line back if no prompt is
    /// open.
    pub fn offer(&self, line: String) -> Option<String> {
        match self.lock().take() {
            Some(sender) => {
                // A dropped receiver means the sign-in was abandoned.
                let _ = sender.send(line);
                None
            }
            None => Some(line),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<oneshot::Sender<String>>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl PopupHandler for TerminalPopup {
    async fn google_credential(&self) -> Result<Option<SecretString>, IdentityError> {
        let (tx, rx) = oneshot::channel();
        {
            let mut pending = self.lock();
            if pending.is_some() {
                return Err(IdentityError::new(
                    "auth/cancelled-popup-request",
                    "Another sign-in prompt is already open",
                ));
            }
            *pending = Some(tx);
        }

        println!("Paste a Google ID token and press Enter (empty line cancels):");

        match rx.await {
            Ok(token) if !token.trim().is_empty() => {
                Ok(Some(SecretString::from(token.trim().to_string())))
            }
            _ => Ok(None),
        }
    }
}
