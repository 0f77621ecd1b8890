//! # Authflow Shared
//!
//! Request and response bodies exchanged with the auth API.
//! Kept apart from `authflow-core` so a backend written in Rust can depend on
//! the same shapes.

pub mod dto;
pub mod response;

pub use response::{ErrorBody, MessageResponse, TokenResponse};
