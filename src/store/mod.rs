pub mod memory;
pub mod supabase;

pub use memory::MemoryProfileStore;
pub use supabase::{SupabaseConfig, SupabaseProfileStore};

use async_trait::async_trait;
use serde::Serialize;

use crate::error::AppError;
use crate::profile::Profile;

/// Partial profile write. Only the fields present are touched; today the
/// settings surface only ever writes `preferences`.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileUpdate {
    pub preferences: serde_json::Value,
}

/// The backend boundary owning the remote profile record.
///
/// Reads are at-least-once, writes are last-write-wins; two overlapping
/// `update_profile` calls race and the backend decides. Authentication,
/// transport and error codes are opaque to callers; failures surface as
/// `AppError::Store`.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn get_profile(&self) -> Result<Profile, AppError>;
    async fn update_profile(&self, update: ProfileUpdate) -> Result<Profile, AppError>;
}
