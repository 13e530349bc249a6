use serde::Serialize;
use serde_json::{Map, Value};
use ts_rs::TS;

use crate::error::AppError;

use super::keys;
use super::schema::{
    meaningful_credentials, resolve_claude_code, resolve_codex, to_editor_json,
};

/// Inline error shown under a buffer that does not parse. Fixed text; the
/// editor is a raw JSON field, not a schema-aware form.
pub const INVALID_JSON_MESSAGE: &str = "Invalid JSON format";

/// The three editable JSON fields of the settings form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub enum FormField {
    ClaudeEnv,
    ClaudeCredentials,
    CodexEnv,
}

/// One editable buffer: verbatim text plus its current validation error.
#[derive(Debug, Clone, Default, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct FieldState {
    pub text: String,
    pub error: Option<String>,
}

impl FieldState {
    fn valid(text: String) -> Self {
        Self { text, error: None }
    }
}

/// Form state as the UI renders it.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct FormSnapshot {
    pub claude_env: FieldState,
    pub claude_credentials: FieldState,
    pub codex_env: FieldState,
    pub saving: bool,
}

/// Editable settings form over the profile's preferences document.
///
/// The form owns its text buffers exclusively: once the user starts editing,
/// nothing outside the form mutates them. Validation is per-field and purely
/// syntactic: any parseable JSON is accepted; the persisted shape is built
/// at save time.
#[derive(Debug, Clone)]
pub struct SettingsForm {
    claude_env: FieldState,
    claude_credentials: FieldState,
    codex_env: FieldState,
    saving: bool,
}

impl SettingsForm {
    /// Seed the buffers from a preferences document (or none), normalizing
    /// whatever shape generation it carries.
    pub fn from_preferences(prefs: Option<&Value>) -> Self {
        let claude = resolve_claude_code(prefs);
        let codex = resolve_codex(prefs);
        Self {
            claude_env: FieldState::valid(to_editor_json(&claude.env)),
            claude_credentials: FieldState::valid(to_editor_json(&claude.credentials)),
            codex_env: FieldState::valid(to_editor_json(&codex.env)),
            saving: false,
        }
    }

    fn buffer(&self, field: FormField) -> &FieldState {
        match field {
            FormField::ClaudeEnv => &self.claude_env,
            FormField::ClaudeCredentials => &self.claude_credentials,
            FormField::CodexEnv => &self.codex_env,
        }
    }

    fn buffer_mut(&mut self, field: FormField) -> &mut FieldState {
        match field {
            FormField::ClaudeEnv => &mut self.claude_env,
            FormField::ClaudeCredentials => &mut self.claude_credentials,
            FormField::CodexEnv => &mut self.codex_env,
        }
    }

    pub fn text(&self, field: FormField) -> &str {
        &self.buffer(field).text
    }

    pub fn error(&self, field: FormField) -> Option<&str> {
        self.buffer(field).error.as_deref()
    }

    pub fn saving(&self) -> bool {
        self.saving
    }

    pub(crate) fn set_saving(&mut self, saving: bool) {
        self.saving = saving;
    }

    /// Store edited text verbatim and re-validate that field.
    pub fn set_field(&mut self, field: FormField, text: impl Into<String>) {
        self.buffer_mut(field).text = text.into();
        self.validate_field(field);
    }

    /// Parse one buffer. Success clears the field error; failure pins the
    /// fixed inline message.
    pub fn validate_field(&mut self, field: FormField) -> bool {
        let ok = serde_json::from_str::<Value>(&self.buffer(field).text).is_ok();
        self.buffer_mut(field).error = if ok {
            None
        } else {
            Some(INVALID_JSON_MESSAGE.to_string())
        };
        ok
    }

    /// Validate every buffer, leaving each field's error state behind.
    pub fn validate_all(&mut self) -> bool {
        let claude_env = self.validate_field(FormField::ClaudeEnv);
        let claude_credentials = self.validate_field(FormField::ClaudeCredentials);
        let codex_env = self.validate_field(FormField::CodexEnv);
        claude_env && claude_credentials && codex_env
    }

    fn parsed(&self, field: FormField) -> Result<Value, AppError> {
        Ok(serde_json::from_str(&self.buffer(field).text)?)
    }

    /// Build the preferences document to persist: current-shape sections for
    /// both agents shallow-merged over the existing document. Agent keys win,
    /// the legacy `codexCLI` key is dropped, everything else survives.
    pub fn build_preferences(&self, existing: Option<&Value>) -> Result<Value, AppError> {
        let claude_env = self.parsed(FormField::ClaudeEnv)?;
        let credentials = self.parsed(FormField::ClaudeCredentials)?;
        let codex_env = self.parsed(FormField::CodexEnv)?;

        // Empty placeholders persist as null, never as {} or "".
        let credentials = if meaningful_credentials(&credentials) {
            credentials
        } else {
            Value::Null
        };

        let mut claude_section = Map::new();
        claude_section.insert(keys::ENV.to_string(), claude_env);
        claude_section.insert(keys::CREDENTIALS.to_string(), credentials);

        let mut codex_section = Map::new();
        codex_section.insert(keys::ENV.to_string(), codex_env);

        let mut merged = match existing.and_then(Value::as_object) {
            Some(map) => map.clone(),
            None => Map::new(),
        };
        merged.insert(keys::CLAUDE_CODE.to_string(), Value::Object(claude_section));
        merged.insert(keys::CODEX.to_string(), Value::Object(codex_section));
        merged.remove(keys::LEGACY_CODEX_CLI);

        Ok(Value::Object(merged))
    }

    pub fn snapshot(&self) -> FormSnapshot {
        FormSnapshot {
            claude_env: self.claude_env.clone(),
            claude_credentials: self.claude_credentials.clone(),
            codex_env: self.codex_env.clone(),
            saving: self.saving,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_profile_seeds_documented_defaults() {
        let form = SettingsForm::from_preferences(None);
        assert!(form.text(FormField::ClaudeEnv).contains("ANTHROPIC_API_KEY"));
        assert_eq!(form.text(FormField::ClaudeCredentials), "{}");
        assert!(form.text(FormField::CodexEnv).contains("OPENAI_API_KEY"));
        assert!(form.error(FormField::ClaudeEnv).is_none());
        assert!(!form.saving());
    }

    #[test]
    fn test_edit_revalidates_single_field() {
        let mut form = SettingsForm::from_preferences(None);

        form.set_field(FormField::CodexEnv, "{env:}");
        assert_eq!(form.error(FormField::CodexEnv), Some(INVALID_JSON_MESSAGE));
        assert!(form.error(FormField::ClaudeEnv).is_none());

        form.set_field(FormField::CodexEnv, r#"{ "OPENAI_API_KEY": "k" }"#);
        assert!(form.error(FormField::CodexEnv).is_none());
    }

    #[test]
    fn test_arbitrary_json_shapes_are_accepted() {
        let mut form = SettingsForm::from_preferences(None);
        form.set_field(FormField::ClaudeEnv, "[1, 2, 3]");
        assert!(form.error(FormField::ClaudeEnv).is_none());
        assert!(form.validate_all());
    }

    #[test]
    fn test_validate_all_flags_every_invalid_field() {
        let mut form = SettingsForm::from_preferences(None);
        form.buffer_mut(FormField::ClaudeEnv).text = "{".into();
        form.buffer_mut(FormField::CodexEnv).text = "{env:}".into();

        assert!(!form.validate_all());
        assert!(form.error(FormField::ClaudeEnv).is_some());
        assert!(form.error(FormField::ClaudeCredentials).is_none());
        assert!(form.error(FormField::CodexEnv).is_some());
    }

    #[test]
    fn test_build_preferences_writes_current_shape() {
        let mut form = SettingsForm::from_preferences(None);
        form.set_field(FormField::ClaudeEnv, r#"{ "ANTHROPIC_API_KEY": "x" }"#);
        form.set_field(FormField::ClaudeCredentials, r#"{ "token": "t" }"#);
        form.set_field(FormField::CodexEnv, r#"{ "OPENAI_API_KEY": "k" }"#);

        let prefs = form.build_preferences(None).unwrap();
        assert_eq!(
            prefs,
            serde_json::json!({
                "claudeCode": {
                    "env": { "ANTHROPIC_API_KEY": "x" },
                    "credentials": { "token": "t" }
                },
                "codex": { "env": { "OPENAI_API_KEY": "k" } }
            })
        );
    }

    #[test]
    fn test_build_preferences_nulls_empty_credentials() {
        let form = SettingsForm::from_preferences(None);
        let prefs = form.build_preferences(None).unwrap();
        assert_eq!(prefs["claudeCode"]["credentials"], Value::Null);
    }

    #[test]
    fn test_merge_preserves_unrelated_keys_and_drops_legacy() {
        let existing = serde_json::json!({
            "theme": "dark",
            "codexCLI": { "OPENAI_API_KEY": "old" },
            "claudeCode": { "ANTHROPIC_API_KEY": "old" }
        });
        let form = SettingsForm::from_preferences(Some(&existing));
        let prefs = form.build_preferences(Some(&existing)).unwrap();

        assert_eq!(prefs["theme"], "dark");
        assert!(prefs.get("codexCLI").is_none());
        // Legacy flat map was rewritten to the current shape.
        assert_eq!(
            prefs["claudeCode"]["env"],
            serde_json::json!({ "ANTHROPIC_API_KEY": "old" })
        );
        // The legacy codexCLI value migrated into codex.env.
        assert_eq!(
            prefs["codex"]["env"],
            serde_json::json!({ "OPENAI_API_KEY": "old" })
        );
    }

    #[test]
    fn test_build_preferences_fails_on_invalid_buffer() {
        let mut form = SettingsForm::from_preferences(None);
        form.buffer_mut(FormField::CodexEnv).text = "{env:}".into();
        assert!(form.build_preferences(None).is_err());
    }

    #[test]
    fn test_saved_document_round_trips() {
        let legacy = serde_json::json!({
            "claudeCode": { "ANTHROPIC_API_KEY": "x", "credentials": { "token": "t" } },
            "codexCLI": { "OPENAI_API_KEY": "k" }
        });
        let form = SettingsForm::from_preferences(Some(&legacy));
        let saved = form.build_preferences(Some(&legacy)).unwrap();

        // Re-seeding from the saved document reproduces the same buffers.
        let reloaded = SettingsForm::from_preferences(Some(&saved));
        assert_eq!(
            form.text(FormField::ClaudeEnv),
            reloaded.text(FormField::ClaudeEnv)
        );
        assert_eq!(
            form.text(FormField::ClaudeCredentials),
            reloaded.text(FormField::ClaudeCredentials)
        );
        assert_eq!(
            form.text(FormField::CodexEnv),
            reloaded.text(FormField::CodexEnv)
        );

        // And a second save is a no-op on the document.
        assert_eq!(reloaded.build_preferences(Some(&saved)).unwrap(), saved);
    }
}
