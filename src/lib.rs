pub mod error;
pub mod logging;
pub mod notifications;
pub mod profile;
pub mod settings;
pub mod store;

use std::sync::Arc;

pub use error::AppError;
pub use notifications::{LogNotifier, Notify, QueueNotifier, Toast, ToastKind};
pub use profile::{Profile, ProfileCache, ProfileSnapshot};
pub use settings::{FormField, FormSnapshot, SettingsForm};
pub use store::{
    MemoryProfileStore, ProfileStore, ProfileUpdate, SupabaseConfig, SupabaseProfileStore,
};

use notifications::{notify_invalid_settings, notify_settings_save_failed, notify_settings_saved};

/// One settings session: profile store, cache, and notification sink.
///
/// Created when the user opens the settings surface and dropped when they
/// leave it; all state lives here, injected, rather than in module globals.
/// The UI shell calls these methods from its event handlers.
pub struct SettingsApp {
    store: Arc<dyn ProfileStore>,
    profile: ProfileCache,
    notifier: Arc<dyn Notify>,
}

impl SettingsApp {
    pub fn new(store: Arc<dyn ProfileStore>, notifier: Arc<dyn Notify>) -> Self {
        let profile = ProfileCache::new(store.clone());
        Self {
            store,
            profile,
            notifier,
        }
    }

    /// Session against the configured Supabase project, scoped to one
    /// authenticated user.
    pub fn from_env(
        access_token: impl Into<String>,
        user_id: impl Into<String>,
        notifier: Arc<dyn Notify>,
    ) -> Result<Self, AppError> {
        let config = SupabaseConfig::from_env()?;
        let store = Arc::new(SupabaseProfileStore::new(config, access_token, user_id));
        Ok(Self::new(store, notifier))
    }

    /// Current cache state, fetching the profile on first use.
    pub async fn profile(&self) -> ProfileSnapshot {
        self.profile.ensure_loaded().await;
        self.profile.snapshot().await
    }

    /// Explicit re-fetch, e.g. a retry after a failed load.
    pub async fn refresh_profile(&self) -> ProfileSnapshot {
        self.profile.refresh().await;
        self.profile.snapshot().await
    }

    /// Build an editable form seeded from the cached profile's preferences.
    pub async fn settings_form(&self) -> SettingsForm {
        self.profile.ensure_loaded().await;
        let prefs = self.profile.preferences().await;
        SettingsForm::from_preferences(prefs.as_ref())
    }

    /// Validate and persist the form.
    ///
    /// Invalid buffers abort before any network call with one aggregate
    /// toast and return `Ok(false)`. A successful write refreshes the cache
    /// and toasts success. A failed write toasts failure and propagates the
    /// error; the form buffers are untouched, so the user can retry as-is.
    /// Every path emits exactly one toast.
    #[tracing::instrument(skip_all)]
    pub async fn save_settings(&self, form: &mut SettingsForm) -> Result<bool, AppError> {
        if !form.validate_all() {
            notify_invalid_settings(self.notifier.as_ref());
            return Ok(false);
        }

        form.set_saving(true);
        let existing = self.profile.preferences().await;
        let result = match form.build_preferences(existing.as_ref()) {
            Ok(preferences) => self.store.update_profile(ProfileUpdate { preferences }).await,
            Err(e) => Err(e),
        };
        form.set_saving(false);

        match result {
            Ok(profile) => {
                tracing::info!(profile_id = %profile.id, "Agent settings saved");
                self.profile.refresh().await;
                notify_settings_saved(self.notifier.as_ref());
                Ok(true)
            }
            Err(e) => {
                tracing::warn!("Agent settings save failed: {}", e);
                notify_settings_save_failed(self.notifier.as_ref(), &e.to_string());
                Err(e)
            }
        }
    }
}
