use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::AppError;
use crate::profile::Profile;

use super::{ProfileStore, ProfileUpdate};

/// In-process profile store for development sessions and tests.
///
/// Mirrors the remote store's contract (read-your-writes, last-write-wins)
/// without a network. `update_count` exposes how many writes were applied,
/// which dev tooling and tests use to assert that invalid form state never
/// reaches the backend.
pub struct MemoryProfileStore {
    profile: Mutex<Profile>,
    updates: AtomicUsize,
}

impl MemoryProfileStore {
    pub fn new(profile: Profile) -> Self {
        Self {
            profile: Mutex::new(profile),
            updates: AtomicUsize::new(0),
        }
    }

    /// Fresh store with a blank, randomly-identified profile.
    pub fn seeded() -> Self {
        Self::new(Profile::blank(uuid::Uuid::new_v4().to_string()))
    }

    pub fn update_count(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Profile>, AppError> {
        self.profile
            .lock()
            .map_err(|_| AppError::Internal("profile store lock poisoned".into()))
    }
}

#[async_trait]
impl ProfileStore for MemoryProfileStore {
    async fn get_profile(&self) -> Result<Profile, AppError> {
        Ok(self.lock()?.clone())
    }

    async fn update_profile(&self, update: ProfileUpdate) -> Result<Profile, AppError> {
        let mut profile = self.lock()?;
        profile.preferences = Some(update.preferences);
        profile.updated_at = Some(chrono::Utc::now().to_rfc3339());
        self.updates.fetch_add(1, Ordering::SeqCst);
        Ok(profile.clone())
    }
}
