pub mod form;
pub mod keys;
pub mod schema;

pub use form::{FormField, FormSnapshot, SettingsForm, INVALID_JSON_MESSAGE};
pub use schema::{
    meaningful_credentials, resolve_claude_code, resolve_codex, ClaudeCodeConfig, CodexConfig,
};
