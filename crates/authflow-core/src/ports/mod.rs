//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod auth_api;
mod identity;
mod redirect;
mod store;

pub use auth_api::{ApiError, ApiErrorKind, AuthApi};
pub use identity::{IdentityError, IdentityErrorKind, IdentityProvider, IdentityUser};
pub use redirect::Redirector;
pub use store::{KeyValueStore, StoreError};
