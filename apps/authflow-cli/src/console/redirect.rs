use std::time::Duration;

use authflow_core::ports::Redirector;

/// Announces the post-login redirect once the delay has passed.
pub struct TerminalRedirector;

impl Redirector for TerminalRedirector {
    fn schedule(&self, target: &str, delay: Duration) {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            tracing::warn!(target_url = %target, "No runtime to schedule the redirect on");
            return;
        };

        let target = target.to_string();
        handle.spawn(async move {
            tokio::time::sleep(delay).await;
            tracing::info!(target_url = %target, "Redirecting");
            println!("-> Redirecting to {target}");
        });
    }
}
