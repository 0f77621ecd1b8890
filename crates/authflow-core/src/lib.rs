//! # Authflow Core
//!
//! The domain layer of the auth flow client.
//! This crate holds the panel state machine, the session model, the ports the
//! controller talks through, and the `AuthFlowController` itself. It has no
//! infrastructure dependencies; HTTP, identity provider and storage adapters
//! live in `authflow-infra`.

pub mod domain;
pub mod error;
pub mod messages;
pub mod ports;
pub mod service;

pub use error::FlowError;
pub use service::{AuthFlowController, ControllerConfig, VerificationMode};
