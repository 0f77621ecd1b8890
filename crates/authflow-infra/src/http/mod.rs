//! HTTP adapter for the auth API.

mod client;

pub use client::{HttpAuthApi, HttpAuthConfig};
