use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Mutex;
use ts_rs::TS;

use crate::store::ProfileStore;

use super::Profile;

/// Cache status as the UI renders it.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSnapshot {
    pub profile: Option<Profile>,
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Default)]
struct CacheInner {
    profile: Option<Profile>,
    loading: bool,
    error: Option<String>,
    started: bool,
}

/// Process-local cache of one remote profile.
///
/// Holds the last successfully fetched profile plus loading/error status.
/// A failed fetch records the error and keeps the stale profile; a later
/// successful fetch clears it. Overlapping fetches are not de-duplicated or
/// cancelled; callers race and the last response wins, matching the
/// backend's own write semantics.
pub struct ProfileCache {
    store: Arc<dyn ProfileStore>,
    inner: Mutex<CacheInner>,
}

impl ProfileCache {
    pub fn new(store: Arc<dyn ProfileStore>) -> Self {
        Self {
            store,
            inner: Mutex::new(CacheInner::default()),
        }
    }

    /// Trigger the one automatic fetch on first use. Subsequent calls are
    /// no-ops; consumers re-fetch explicitly through `refresh`.
    pub async fn ensure_loaded(&self) {
        {
            let mut inner = self.inner.lock().await;
            if inner.started {
                return;
            }
            inner.started = true;
        }
        self.fetch().await;
    }

    /// Fetch the profile from the store and update the cached copy.
    pub async fn fetch(&self) {
        {
            let mut inner = self.inner.lock().await;
            inner.loading = true;
        }

        let result = self.store.get_profile().await;

        let mut inner = self.inner.lock().await;
        match result {
            Ok(profile) => {
                tracing::debug!(profile_id = %profile.id, "Profile loaded");
                inner.profile = Some(profile);
                inner.error = None;
            }
            Err(e) => {
                // Keep the stale profile; the UI shows it alongside the error.
                tracing::warn!("Profile fetch failed: {}", e);
                inner.error = Some(e.to_string());
            }
        }
        inner.loading = false;
    }

    /// Re-fetch after a mutation. Semantically identical to `fetch`.
    pub async fn refresh(&self) {
        self.fetch().await;
    }

    pub async fn snapshot(&self) -> ProfileSnapshot {
        let inner = self.inner.lock().await;
        ProfileSnapshot {
            profile: inner.profile.clone(),
            loading: inner.loading,
            error: inner.error.clone(),
        }
    }

    /// The cached profile's preferences document, if any.
    pub async fn preferences(&self) -> Option<serde_json::Value> {
        let inner = self.inner.lock().await;
        inner.profile.as_ref().and_then(|p| p.preferences.clone())
    }
}
