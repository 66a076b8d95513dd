use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;

use interviewselect_core::{Entity, ProfileId};
use interviewselect_profiles::Profile;

use super::{ProfileStore, StoreError};

/// In-memory profile store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryProfileStore {
    inner: RwLock<BTreeMap<ProfileId, Profile>>,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every stored profile (test isolation).
    pub fn reset(&self) {
        if let Ok(mut map) = self.inner.write() {
            map.clear();
        }
    }

    pub fn len(&self) -> usize {
        self.inner.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned() -> StoreError {
    StoreError::Backend("profile map poisoned".to_string())
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn get(&self, id: &ProfileId) -> Result<Option<Profile>, StoreError> {
        let map = self.inner.read().map_err(|_| poisoned())?;
        Ok(map.get(id).cloned())
    }

    async fn insert(&self, profile: &Profile) -> Result<(), StoreError> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        if map.contains_key(profile.id()) {
            return Err(StoreError::Conflict(profile.id().to_string()));
        }
        map.insert(*profile.id(), profile.clone());
        Ok(())
    }

    async fn put(&self, profile: &Profile) -> Result<(), StoreError> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        map.insert(*profile.id(), profile.clone());
        Ok(())
    }

    async fn delete(&self, id: &ProfileId) -> Result<(), StoreError> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        map.remove(id);
        Ok(())
    }
}
