//! Interactive console - reads commands from stdin and drives the controller.
//!
//! Network-bound commands run as their own tasks so the prompt stays
//! responsive; the controller rejects a second request of the same kind while
//! one is in flight.

mod commands;
mod popup;
mod redirect;
mod view;

use std::future::Future;
use std::sync::Arc;

use secrecy::SecretString;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use authflow_core::{AuthFlowController, FlowError};

pub use commands::Command;
pub use popup::TerminalPopup;
pub use redirect::TerminalRedirector;

use crate::state::AppState;

/// Run on stdin until `quit` or end of input.
pub async fn run(state: AppState) -> anyhow::Result<()> {
    run_with(state, BufReader::new(tokio::io::stdin())).await
}

async fn run_with<R>(state: AppState, input: R) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let controller = state.controller.clone();

    // A broken store is shown on the status line; `clear` can still fix it.
    match controller.restore().await {
        Ok(Some(session)) => println!("{}", view::render_session(&session)),
        Ok(None) => {}
        Err(e) => {
            tracing::warn!(error = %e, "Could not restore session");
            println!("{}\nType 'clear' to reset local data.", e.user_message());
        }
    }
    spawn_and_report(&controller, |c| async move { c.check_backend().await });

    println!("{}", commands::HELP);
    print!("{}", view::render(&controller.snapshot()));

    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        let Some(line) = state.popup.offer(line) else {
            continue;
        };

        let command = match Command::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                println!("{e}");
                continue;
            }
        };

        if command == Command::Quit {
            break;
        }
        dispatch(&controller, command).await;
    }

    tracing::debug!("Console closed");
    Ok(())
}

async fn dispatch(controller: &Arc<AuthFlowController>, command: Command) {
    match command {
        Command::Navigate(navigation) => match controller.navigate(navigation) {
            Ok(_) => print!("{}", view::render(&controller.snapshot())),
            Err(e) => println!("{}", e.user_message()),
        },
        Command::Register {
            display_name,
            email,
            password,
        } => {
            let password = SecretString::from(password);
            spawn_and_report(controller, move |c| async move {
                c.register(&display_name, &email, &password).await
            });
        }
        Command::Login { email, password } => {
            let password = SecretString::from(password);
            spawn_and_report(controller, move |c| async move {
                c.login(&email, &password).await.map(|_| ())
            });
        }
        Command::Google => {
            spawn_and_report(controller, |c| async move {
                c.federated_login().await.map(|_| ())
            });
        }
        Command::Resend => {
            spawn_and_report(controller, |c| async move { c.resend_verification().await });
        }
        Command::ResetPassword { email } => {
            spawn_and_report(controller, move |c| async move {
                c.request_password_reset(&email).await
            });
        }
        Command::ConfirmReset {
            oob_code,
            new_password,
        } => {
            let new_password = SecretString::from(new_password);
            spawn_and_report(controller, move |c| async move {
                c.confirm_password_reset(&oob_code, &new_password).await
            });
        }
        Command::Logout => report(controller, controller.logout().await),
        Command::Clear => report(controller, controller.clear_local_data().await),
        Command::Whoami => match controller.restore().await {
            Ok(Some(session)) => println!("{}", view::render_session(&session)),
            Ok(None) => println!("Not signed in."),
            Err(e) => println!("{}", e.user_message()),
        },
        Command::Ping => {
            spawn_and_report(controller, |c| async move {
                c.check_backend().await?;
                println!("Backend is reachable.");
                Ok::<(), FlowError>(())
            });
        }
        Command::Show => print!("{}", view::render(&controller.snapshot())),
        Command::Help => println!("{}", commands::HELP),
        Command::Quit => {}
    }
}

/// Run `op` on its own task and redraw when it finishes.
fn spawn_and_report<F, Fut>(controller: &Arc<AuthFlowController>, op: F)
where
    F: FnOnce(Arc<AuthFlowController>) -> Fut + Send + 'static,
    Fut: Future<Output = Result<(), FlowError>> + Send + 'static,
{
    let controller = controller.clone();
    tokio::spawn(async move {
        let result = op(controller.clone()).await;
        report(&controller, result);
    });
}

fn report(controller: &AuthFlowController, result: Result<(), FlowError>) {
    match result {
        Err(err @ FlowError::Busy(_)) => {
            // Status is left alone so the running request's outcome still shows.
            println!("{}", err.user_message());
        }
        _ => print!("{}", view::render(&controller.snapshot())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    #[tokio::test]
    async fn test_corrupt_storage_keeps_console_running() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        std::fs::write(&path, "{not json").unwrap();

        let storage_path = path.display().to_string();
        let config = AppConfig::from_lookup(|key| match key {
            "AUTHFLOW_STORAGE_PATH" => Some(storage_path.clone()),
            "AUTHFLOW_API_BASE_URL" => Some("http://127.0.0.1:1".to_string()),
            _ => None,
        })
        .unwrap();
        let state = AppState::new(&config).await.unwrap();

        let input: &[u8] = b"clear\nquit\n";
        run_with(state.clone(), input).await.unwrap();

        // The `clear` command ran and removed the broken file.
        assert!(!path.exists());
        assert!(state.controller.restore().await.unwrap().is_none());
    }
}
