//! Services - the auth flow controller and its helpers.

mod controller;
mod session_store;
mod single_flight;


pub use controller::{AuthFlowController, ControllerConfig, VerificationMode};
pub use session_store::SessionStore;
