use std::time::Duration;

/// Navigation away from the auth panels once a session is established.
pub trait Redirector: Send + Sync {
    /// Schedule a redirect to `target` after `delay`. Must not block.
    fn schedule(&self, target: &str, delay: Duration);
}
