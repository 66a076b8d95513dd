//! Infrastructure layer: profile storage adapters and configuration.

pub mod config;
pub mod store;

pub use config::{AppConfig, ConfigError, IdentityBackend};
pub use store::{InMemoryProfileStore, PostgresProfileStore, ProfileStore, StoreError};
