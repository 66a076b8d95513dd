use async_trait::async_trait;
use thiserror::Error;

use interviewselect_core::ProfileId;
use interviewselect_profiles::Profile;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Create was attempted for an id that is already stored.
    #[error("profile already exists: {0}")]
    Conflict(String),

    /// A stored document could not be decoded into a profile.
    #[error("corrupt profile document: {0}")]
    Corrupt(String),

    /// Connection, query or driver failure.
    #[error("storage backend failure: {0}")]
    Backend(String),
}

/// Key-value profile storage collaborator.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn get(&self, id: &ProfileId) -> Result<Option<Profile>, StoreError>;

    /// Store a new profile; fails with [`StoreError::Conflict`] if the id exists.
    async fn insert(&self, profile: &Profile) -> Result<(), StoreError>;

    /// Store a profile, replacing whatever is stored under its id.
    async fn put(&self, profile: &Profile) -> Result<(), StoreError>;

    /// Remove a profile. Removing an absent id is not an error.
    async fn delete(&self, id: &ProfileId) -> Result<(), StoreError>;
}
