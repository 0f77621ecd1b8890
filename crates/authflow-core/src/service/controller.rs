//! The auth flow controller.
//!
//! Mediates between user actions, the auth API and the identity provider.
//! It owns the flow state (visible panel, pending email, status line) and
//! persists the session through [`SessionStore`]. Every failure is mapped to a
//! status line and returned; nothing is retried and nothing leaves the
//! controller unusable.

use std::str::FromStr;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use secrecy::SecretString;

use super::session_store::SessionStore;
use super::single_flight::{FlightGuard, InFlight};
use crate::domain::{FlowState, Navigation, Operation, Panel, Session, StatusMessage};
use crate::error::FlowError;
use crate::messages;
use crate::ports::{ApiErrorKind, AuthApi, IdentityProvider, KeyValueStore, Redirector};

/// Who decides that an email address is verified before a password login.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerificationMode {
    /// Sign in through the identity provider first and refuse unverified
    /// accounts before the backend is contacted.
    #[default]
    SdkAssisted,
    /// Send credentials straight to the backend and rely on its verification
    /// check.
    BackendOnly,
}

impl FromStr for VerificationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sdk" | "sdk-assisted" | "sdk_assisted" => Ok(VerificationMode::SdkAssisted),
            "backend" | "backend-only" | "backend_only" => Ok(VerificationMode::BackendOnly),
            other => Err(format!("unknown verification mode: {other}")),
        }
    }
}

/// Controller configuration.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    pub verification_mode: VerificationMode,
    /// Where to go once a session is established.
    pub redirect_target: String,
    /// How long the success message stays up before redirecting.
    pub redirect_delay: Duration,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            verification_mode: VerificationMode::default(),
            redirect_target: "/dashboard".to_string(),
            redirect_delay: Duration::from_millis(2000),
        }
    }
}

/// Auth flow controller.
pub struct AuthFlowController {
    api: Arc<dyn AuthApi>,
    identity: Arc<dyn IdentityProvider>,
    sessions: SessionStore,
    redirector: Arc<dyn Redirector>,
    config: ControllerConfig,
    state: Mutex<FlowState>,
    flights: InFlight,
}

impl AuthFlowController {
    pub fn new(
        api: Arc<dyn AuthApi>,
        identity: Arc<dyn IdentityProvider>,
        store: Arc<dyn KeyValueStore>,
        redirector: Arc<dyn Redirector>,
        config: ControllerConfig,
    ) -> Self {
        Self {
            api,
            identity,
            sessions: SessionStore::new(store),
            redirector,
            config,
            state: Mutex::new(FlowState::new()),
            flights: InFlight::default(),
        }
    }

    /// Copy of the current flow state, for rendering.
    pub fn snapshot(&self) -> FlowState {
        self.lock_state().clone()
    }

    pub fn panel(&self) -> Panel {
        self.lock_state().panel()
    }

    /// Whether an operation of this kind is running.
    pub fn is_busy(&self, operation: Operation) -> bool {
        self.flights.is_active(operation)
    }

    // --- navigation ---

    pub fn navigate(&self, navigation: Navigation) -> Result<Panel, FlowError> {
        let mut state = self.lock_state();
        let from = state.panel();
        state
            .navigate(navigation)
            .ok_or(FlowError::InvalidTransition { from, navigation })
    }

    pub fn show_login(&self) -> Result<Panel, FlowError> {
        self.navigate(Navigation::ShowLogin)
    }

    pub fn show_signup(&self) -> Result<Panel, FlowError> {
        self.navigate(Navigation::ShowSignup)
    }

    pub fn show_password_reset(&self) -> Result<Panel, FlowError> {
        self.navigate(Navigation::ForgotPassword)
    }

    pub fn back_to_login(&self) -> Result<Panel, FlowError> {
        self.navigate(Navigation::Back)
    }

    // --- operations ---

    /// Create an account and wait for email verification.
    pub async fn register(
        &self,
        display_name: &str,
        email: &str,
        password: &SecretString,
    ) -> Result<(), FlowError> {
        let _flight = self.begin(Operation::Register)?;
        tracing::debug!(email, "Submitting registration");
        self.update(|state| state.remember_email(email));

        self.api
            .register(display_name, email, password)
            .await
            .map_err(|e| self.fail(e.into()))?;

        self.update(|state| {
            state.enter(Panel::WaitingVerification);
            state.set_status(StatusMessage::success(messages::REGISTERED));
        });
        tracing::info!("Registration accepted, waiting for email verification");
        Ok(())
    }

    /// Email/password login. See [`VerificationMode`] for who checks that the
    /// address is verified.
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<Session, FlowError> {
        let _flight = self.begin(Operation::Login)?;
        tracing::debug!(email, mode = ?self.config.verification_mode, "Submitting login");

        if self.config.verification_mode == VerificationMode::SdkAssisted {
            let user = self
                .identity
                .sign_in_with_password(email, password)
                .await
                .map_err(|e| self.fail(e.into()))?;

            if !user.email_verified {
                if let Err(e) = self.identity.sign_out().await {
                    tracing::warn!(error = %e, "Identity sign-out after unverified login failed");
                }
                return Err(self.fail(FlowError::EmailNotVerified));
            }
        }

        let session = self
            .api
            .login(email, password)
            .await
            .map_err(|e| self.fail(e.into()))?;

        self.establish(session, messages::LOGGED_IN).await
    }

    /// Popup sign-in with the identity provider, exchanged for a backend session.
    pub async fn federated_login(&self) -> Result<Session, FlowError> {
        let _flight = self.begin(Operation::FederatedLogin)?;

        let user = self
            .identity
            .sign_in_with_popup()
            .await
            .map_err(|e| self.fail(e.into()))?;
        tracing::debug!(uid = %user.uid, "Identity provider sign-in completed");

        let session = self
            .api
            .login_with_id_token(user.id_token())
            .await
            .map_err(|e| self.fail(e.into()))?;

        self.establish(session, messages::FEDERATED_LOGGED_IN).await
    }

    /// Resend the verification email for the last registered address.
    pub async fn resend_verification(&self) -> Result<(), FlowError> {
        let _flight = self.begin(Operation::ResendVerification)?;

        let pending = self.lock_state().pending_email().map(str::to_owned);
        let Some(email) = pending else {
            return Err(self.fail(FlowError::NoPendingEmail));
        };

        self.api
            .resend_verification(&email)
            .await
            .map_err(|e| self.fail(e.into()))?;

        self.set_status(StatusMessage::success(messages::VERIFICATION_RESENT));
        Ok(())
    }

    /// Ask for a password reset link. The outcome shown is the same whether
    /// or not the address belongs to an account; only a transport failure is
    /// reported.
    pub async fn request_password_reset(&self, email: &str) -> Result<(), FlowError> {
        let _flight = self.begin(Operation::PasswordReset)?;
        tracing::debug!(email, "Requesting password reset");

        match self.api.request_password_reset(email).await {
            Ok(()) => {}
            Err(e) if e.kind == ApiErrorKind::Transport => return Err(self.fail(e.into())),
            Err(e) => {
                tracing::debug!(
                    status = ?e.status,
                    kind = ?e.kind,
                    "Password reset rejected upstream"
                );
            }
        }

        self.set_status(StatusMessage::success(messages::PASSWORD_RESET_REQUESTED));
        Ok(())
    }

    /// Complete a password reset with the code from the reset email.
    pub async fn confirm_password_reset(
        &self,
        oob_code: &str,
        new_password: &SecretString,
    ) -> Result<(), FlowError> {
        let _flight = self.begin(Operation::ConfirmPasswordReset)?;

        self.api
            .confirm_password_reset(oob_code, new_password)
            .await
            .map_err(|e| self.fail(e.into()))?;

        self.update(|state| {
            state.enter(Panel::Login);
            state.set_status(StatusMessage::success(messages::PASSWORD_RESET_CONFIRMED));
        });
        Ok(())
    }

    /// Remove the persisted session.
    pub async fn logout(&self) -> Result<(), FlowError> {
        self.sessions.remove().await.map_err(|e| self.fail(e.into()))?;
        self.set_status(StatusMessage::info(messages::LOGGED_OUT));
        tracing::info!("Session removed");
        Ok(())
    }

    /// Wipe the whole local store.
    pub async fn clear_local_data(&self) -> Result<(), FlowError> {
        self.sessions
            .clear_all()
            .await
            .map_err(|e| self.fail(e.into()))?;
        self.set_status(StatusMessage::info(messages::LOCAL_DATA_CLEARED));
        tracing::info!("Local data cleared");
        Ok(())
    }

    /// The persisted session, if any. Announces it on the status line.
    pub async fn restore(&self) -> Result<Option<Session>, FlowError> {
        let session = self.sessions.load().await.map_err(|e| self.fail(e.into()))?;
        if session.is_some() {
            self.set_status(StatusMessage::info(messages::ALREADY_LOGGED_IN));
        }
        Ok(session)
    }

    /// Ping the backend. Only a failure touches the status line.
    pub async fn check_backend(&self) -> Result<(), FlowError> {
        let _flight = self.begin(Operation::CheckBackend)?;
        self.api.ping().await.map_err(|e| self.fail(e.into()))?;
        tracing::debug!("Backend is reachable");
        Ok(())
    }

    // --- helpers ---

    async fn establish(&self, session: Session, message: &str) -> Result<Session, FlowError> {
        self.sessions
            .save(&session)
            .await
            .map_err(|e| self.fail(e.into()))?;

        self.set_status(StatusMessage::success(message));
        self.redirector
            .schedule(&self.config.redirect_target, self.config.redirect_delay);
        tracing::info!(target_url = %self.config.redirect_target, "Session established");
        Ok(session)
    }

    fn begin(&self, operation: Operation) -> Result<FlightGuard<'_>, FlowError> {
        self.flights.begin(operation).ok_or_else(|| {
            tracing::debug!(%operation, "Ignoring request while one is in flight");
            FlowError::Busy(operation)
        })
    }

    /// Show `err` on the status line and hand it back.
    fn fail(&self, err: FlowError) -> FlowError {
        tracing::warn!(error = %err, "Auth flow step failed");
        self.set_status(StatusMessage::error(err.user_message()));
        err
    }

    fn set_status(&self, status: StatusMessage) {
        self.update(|state| state.set_status(status));
    }

    fn update(&self, apply: impl FnOnce(&mut FlowState)) {
        apply(&mut *self.lock_state());
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, FlowState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
