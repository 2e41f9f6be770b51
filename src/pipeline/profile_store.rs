//! Read-only access to user medical profiles. The store itself lives
//! outside this crate; a `None` or an error both mean "continue with the
//! empty default profile" (fail-open).

use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::UserMedicalProfile;

#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("Profile store unavailable: {0}")]
    Unavailable(String),

    #[error("Profile record malformed: {0}")]
    Malformed(String),
}

#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn load(&self, user_id: &str) -> Result<Option<UserMedicalProfile>, ProfileError>;
}

/// In-memory store for tests and embedded deployments.
#[derive(Default)]
pub struct InMemoryProfileStore {
    profiles: HashMap<String, UserMedicalProfile>,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, user_id: impl Into<String>, profile: UserMedicalProfile) {
        self.profiles.insert(user_id.into(), profile);
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn load(&self, user_id: &str) -> Result<Option<UserMedicalProfile>, ProfileError> {
        Ok(self.profiles.get(user_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_user_is_none_not_error() {
        let store = InMemoryProfileStore::new();
        assert!(store.load("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn stored_profile_round_trips() {
        let mut store = InMemoryProfileStore::new();
        let mut profile = UserMedicalProfile::empty();
        profile.medications = vec!["warfarin".into()];
        store.insert("u1", profile);

        let loaded = store.load("u1").await.unwrap().unwrap();
        assert_eq!(loaded.medications, vec!["warfarin"]);
    }
}
