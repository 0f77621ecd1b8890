//! # Authflow Infrastructure
//!
//! Concrete implementations of the ports defined in `authflow-core`:
//! the HTTP auth API client, the identity provider client and the
//! key-value stores that hold the session.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external services, file and in-memory stores only
//! - `redis` - Redis-backed session store

pub mod error;
pub mod http;
pub mod identity;
pub mod store;

pub use error::InfraError;
pub use http::{HttpAuthApi, HttpAuthConfig};
pub use identity::{FirebaseConfig, FirebaseIdentity, PopupHandler};
pub use store::{FileStore, InMemoryStore};

#[cfg(feature = "redis")]
pub use store::{RedisConfig, RedisStore};
