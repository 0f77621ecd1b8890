//! Plain-text rendering of the flow state.

use std::fmt::Write;

use authflow_core::domain::{FlowState, Panel, Session, StatusKind, StatusMessage};

fn hint(panel: Panel) -> &'static str {
    match panel {
        Panel::Login => "login <email> <password> | google | goto signup | forgot",
        Panel::Signup => "signup <name...> <email> <password> | google | goto login",
        Panel::WaitingVerification => "resend | back",
        Panel::PasswordResetRequest => "reset <email> | confirm-reset <code> <new-password> | back",
    }
}

/// Tab strip with the visible panel marked, its hints, and the status line.
pub fn render(state: &FlowState) -> String {
    let mut out = String::new();

    let tabs: Vec<String> = state
        .visible_panels()
        .iter()
        .map(|(panel, visible)| {
            if *visible {
                format!("[{panel}]")
            } else {
                format!(" {panel} ")
            }
        })
        .collect();
    let _ = writeln!(out, "{}", tabs.join(" "));

    let panel = state.panel();
    let _ = writeln!(out, "== {panel} ==");
    if panel == Panel::WaitingVerification {
        if let Some(email) = state.pending_email() {
            let _ = writeln!(out, "A verification link was sent to {email}.");
        }
    }
    let _ = writeln!(out, "   {}", hint(panel));

    if let Some(status) = state.status() {
        let _ = writeln!(out, "{}", render_status(status));
    }
    out
}

pub fn render_status(status: &StatusMessage) -> String {
    let marker = match status.kind {
        StatusKind::Info => "i",
        StatusKind::Success => "+",
        StatusKind::Error => "!",
    };
    format!("({marker}) {}", status.text)
}

pub fn render_session(session: &Session) -> String {
    match session.profile() {
        Some(profile) => {
            let provider = profile.auth_provider.as_deref().unwrap_or("email");
            format!(
                "Signed in as {} <{}> via {provider}",
                profile.greeting_name(),
                profile.email
            )
        }
        None => "Signed in (no profile details stored)".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use authflow_core::domain::Navigation;
    use serde_json::json;

    #[test]
    fn test_only_visible_panel_is_marked() {
        let mut state = FlowState::new();
        state.navigate(Navigation::ShowSignup);

        let out = render(&state);
        assert_eq!(out.matches('[').count(), 1);
        assert!(out.contains("[Sign Up]"));
        assert!(out.contains("== Sign Up =="));
    }

    #[test]
    fn test_waiting_panel_shows_pending_email() {
        let mut state = FlowState::new();
        state.remember_email("ana@example.com");
        state.enter(Panel::WaitingVerification);
        state.set_status(StatusMessage::error("No email found. Please register again."));

        let out = render(&state);
        assert!(out.contains("sent to ana@example.com"));
        assert!(out.ends_with("(!) No email found. Please register again.\n"));
    }

    #[test]
    fn test_session_line() {
        let session = Session::new(
            "tok",
            json!({"email": "g@example.com", "display_name": "Gee", "auth_provider": "google"}),
        );
        assert_eq!(render_session(&session), "Signed in as Gee <g@example.com> via google");

        let session = Session::new("tok", json!("opaque"));
        assert_eq!(render_session(&session), "Signed in (no profile details stored)");
    }
}
