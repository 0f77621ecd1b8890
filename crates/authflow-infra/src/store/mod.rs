//! Key-value store implementations - file, Redis and in-memory fallback.

mod file;
mod memory;

#[cfg(feature = "redis")]
mod redis;

pub use file::FileStore;
pub use memory::InMemoryStore;

#[cfg(feature = "redis")]
pub use self::redis::{RedisConfig, RedisStore};
