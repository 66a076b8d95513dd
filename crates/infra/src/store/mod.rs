//! Profile storage boundary.
//!
//! Profiles are stored as whole documents keyed by their id. The store knows
//! nothing about validation or merging: create is guarded on id uniqueness,
//! update is an unconditional overwrite, and concurrent writers race
//! last-write-wins.

pub mod in_memory;
pub mod postgres;
pub mod r#trait;

pub use in_memory::InMemoryProfileStore;
pub use postgres::PostgresProfileStore;
pub use r#trait::{ProfileStore, StoreError};
