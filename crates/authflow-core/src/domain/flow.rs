//! Panel state machine.
//!
//! Exactly one panel is visible at a time. User navigation follows the table
//! in [`Panel::navigate`]; outcome transitions (a successful registration or a
//! completed password reset) are applied by the controller with
//! [`FlowState::enter`].

use std::fmt;

use super::StatusMessage;

/// The auth panel currently shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Panel {
    #[default]
    Login,
    Signup,
    WaitingVerification,
    PasswordResetRequest,
}

impl Panel {
    pub const ALL: [Panel; 4] = [
        Panel::Login,
        Panel::Signup,
        Panel::WaitingVerification,
        Panel::PasswordResetRequest,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Panel::Login => "Login",
            Panel::Signup => "Sign Up",
            Panel::WaitingVerification => "Verify your email",
            Panel::PasswordResetRequest => "Reset password",
        }
    }

    /// Panel reached by a navigation request, or `None` if the request is not
    /// available from this panel.
    pub fn navigate(self, navigation: Navigation) -> Option<Panel> {
        match (self, navigation) {
            (Panel::Login | Panel::Signup, Navigation::ShowLogin) => Some(Panel::Login),
            (Panel::Login | Panel::Signup, Navigation::ShowSignup) => Some(Panel::Signup),
            (Panel::Login, Navigation::ForgotPassword) => Some(Panel::PasswordResetRequest),
            (Panel::WaitingVerification | Panel::PasswordResetRequest, Navigation::Back) => {
                Some(Panel::Login)
            }
            _ => None,
        }
    }
}

impl fmt::Display for Panel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// User-initiated panel changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    ShowLogin,
    ShowSignup,
    ForgotPassword,
    Back,
}

impl fmt::Display for Navigation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Navigation::ShowLogin => "show login",
            Navigation::ShowSignup => "show sign up",
            Navigation::ForgotPassword => "open password reset",
            Navigation::Back => "go back",
        };
        f.write_str(name)
    }
}

/// Flow state owned by the controller: visible panel, the email awaiting
/// verification, and the latest status line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlowState {
    panel: Panel,
    pending_email: Option<String>,
    status: Option<StatusMessage>,
}

impl FlowState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn panel(&self) -> Panel {
        self.panel
    }

    pub fn pending_email(&self) -> Option<&str> {
        self.pending_email.as_deref()
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    /// Visibility of every panel; exactly one entry is `true`.
    pub fn visible_panels(&self) -> [(Panel, bool); 4] {
        Panel::ALL.map(|panel| (panel, panel == self.panel))
    }

    /// Apply a navigation request. The status line is cleared on success.
    pub fn navigate(&mut self, navigation: Navigation) -> Option<Panel> {
        let next = self.panel.navigate(navigation)?;
        self.panel = next;
        self.status = None;
        Some(next)
    }

    /// Force a panel after an operation outcome.
    pub fn enter(&mut self, panel: Panel) {
        self.panel = panel;
    }

    pub fn remember_email(&mut self, email: impl Into<String>) {
        self.pending_email = Some(email.into());
    }

    pub fn set_status(&mut self, status: StatusMessage) {
        self.status = Some(status);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NAVIGATIONS: [Navigation; 4] = [
        Navigation::ShowLogin,
        Navigation::ShowSignup,
        Navigation::ForgotPassword,
        Navigation::Back,
    ];

    #[test]
    fn test_initial_panel_is_login() {
        let state = FlowState::new();
        assert_eq!(state.panel(), Panel::Login);
        assert!(state.pending_email().is_none());
        assert!(state.status().is_none());
    }

    #[test]
    fn test_transition_table() {
        assert_eq!(Panel::Login.navigate(Navigation::ShowSignup), Some(Panel::Signup));
        assert_eq!(Panel::Signup.navigate(Navigation::ShowLogin), Some(Panel::Login));
        assert_eq!(
            Panel::Login.navigate(Navigation::ForgotPassword),
            Some(Panel::PasswordResetRequest)
        );
        assert_eq!(Panel::PasswordResetRequest.navigate(Navigation::Back), Some(Panel::Login));
        assert_eq!(Panel::WaitingVerification.navigate(Navigation::Back), Some(Panel::Login));

        assert_eq!(Panel::Signup.navigate(Navigation::ForgotPassword), None);
        assert_eq!(Panel::Login.navigate(Navigation::Back), None);
        assert_eq!(Panel::WaitingVerification.navigate(Navigation::ShowSignup), None);
        assert_eq!(Panel::PasswordResetRequest.navigate(Navigation::ShowLogin), None);
    }

    #[test]
    fn test_exactly_one_panel_visible_after_any_transition() {
        for start in Panel::ALL {
            for navigation in NAVIGATIONS {
                let mut state = FlowState::new();
                state.enter(start);
                state.navigate(navigation);

                let visible = state
                    .visible_panels()
                    .iter()
                    .filter(|(_, shown)| *shown)
                    .count();
                assert_eq!(visible, 1, "{start:?} + {navigation:?}");
            }
        }
    }

    #[test]
    fn test_rejected_navigation_keeps_state() {
        let mut state = FlowState::new();
        state.set_status(StatusMessage::error("boom"));

        assert_eq!(state.navigate(Navigation::Back), None);
        assert_eq!(state.panel(), Panel::Login);
        assert!(state.status().is_some());
    }

    #[test]
    fn test_navigation_clears_status() {
        let mut state = FlowState::new();
        state.set_status(StatusMessage::info("hello"));

        assert_eq!(state.navigate(Navigation::ShowSignup), Some(Panel::Signup));
        assert!(state.status().is_none());
    }
}
