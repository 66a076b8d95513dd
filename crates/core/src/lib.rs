//! `interviewselect-core`: shared domain building blocks.
//!
//! Pure primitives only (no IO, no HTTP, no storage).

pub mod entity;
pub mod error;
pub mod id;
pub mod timestamp;
pub mod value_object;

pub use entity::Entity;
pub use error::DomainError;
pub use id::ProfileId;
pub use value_object::ValueObject;
