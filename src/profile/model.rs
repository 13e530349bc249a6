use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A user profile as the settings UI sees it.
///
/// `preferences` is a free-form JSON document used as a settings key-value
/// store; the shapes this crate reads and writes into it live in
/// `crate::settings`. The backend owns the record — this type is a
/// read-your-writes copy with no independent identity.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    #[ts(type = "Record<string, unknown> | null")]
    pub preferences: Option<serde_json::Value>,
    pub updated_at: Option<String>,
}

impl Profile {
    /// Blank profile for a known user id. Used by the in-memory store to
    /// seed dev sessions; the remote store always returns fully-populated rows.
    pub fn blank(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: None,
            display_name: None,
            preferences: None,
            updated_at: None,
        }
    }
}
