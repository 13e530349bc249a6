//! Normalization of the preferences document into the current agent-config
//! schema.
//!
//! Three generations of stored shapes are still in the wild:
//! - current: `claudeCode: { env, credentials }`, `codex: { env }`
//! - legacy Claude: `claudeCode` as a flat env map, sometimes with a
//!   `credentials` object mixed in between the environment variables
//! - legacy Codex: a top-level `codexCLI` flat map with no `env` wrapper
//!
//! Each shape is classified into an explicit variant by an ordered rule set
//! and then resolved; writers only ever produce the current shape, so legacy
//! documents disappear one save at a time.

use serde_json::{json, Map, Value};

use super::keys;

// ============================================================================
// Resolved configs
// ============================================================================

/// Claude Code agent configuration in the current schema.
///
/// `env` is always present after resolution (defaulted when the document had
/// none). `credentials` is kept as raw JSON: the editor renders whatever is
/// stored, and the meaningful-credentials gate is applied again at save time.
#[derive(Debug, Clone, PartialEq)]
pub struct ClaudeCodeConfig {
    pub env: Value,
    pub credentials: Value,
}

/// Codex agent configuration in the current schema.
#[derive(Debug, Clone, PartialEq)]
pub struct CodexConfig {
    pub env: Value,
}

/// Env template for a profile that has never configured Claude Code.
pub fn default_claude_env() -> Value {
    json!({ "ANTHROPIC_API_KEY": "" })
}

/// Env template for a profile that has never configured Codex. The first two
/// variables are what the agent runner injects; the third names the model
/// override slot.
pub fn default_codex_env() -> Value {
    json!({
        "OPENAI_API_KEY": "",
        "OPENAI_BASE_URL": "",
        "OPENAI_MODEL": ""
    })
}

/// Rendered in the editor for new profiles; not meaningful, so it persists
/// as `null`.
pub fn default_claude_credentials() -> Value {
    json!({})
}

// ============================================================================
// Shape classification
// ============================================================================

/// Storage generations of the `claudeCode` section.
#[derive(Debug, Clone, PartialEq)]
pub enum ClaudeCodeShape {
    /// Keys drawn only from `{env, credentials}`: already current.
    Current(Map<String, Value>),
    /// Any other object: a flat env map, possibly with `credentials` mixed in.
    LegacyFlat(Map<String, Value>),
    /// Absent or not an object.
    Missing,
}

/// Storage generations of the Codex section.
#[derive(Debug, Clone, PartialEq)]
pub enum CodexShape {
    /// `codex.env` present: already current.
    Nested(Value),
    /// `codex` present without an `env` member; the whole value is the env.
    Bare(Value),
    /// Top-level `codexCLI` map from before the rename.
    LegacyTopLevel(Value),
    Missing,
}

fn prefs_map(prefs: Option<&Value>) -> Option<&Map<String, Value>> {
    prefs.and_then(Value::as_object)
}

pub fn classify_claude_code(prefs: Option<&Value>) -> ClaudeCodeShape {
    let section = match prefs_map(prefs).and_then(|m| m.get(keys::CLAUDE_CODE)) {
        Some(v) => v,
        None => return ClaudeCodeShape::Missing,
    };
    // The legacy split is only defined over maps; anything else falls back
    // to defaults.
    let obj = match section.as_object() {
        Some(o) => o,
        None => return ClaudeCodeShape::Missing,
    };
    if obj.keys().all(|k| k == keys::ENV || k == keys::CREDENTIALS) {
        ClaudeCodeShape::Current(obj.clone())
    } else {
        ClaudeCodeShape::LegacyFlat(obj.clone())
    }
}

pub fn classify_codex(prefs: Option<&Value>) -> CodexShape {
    let map = match prefs_map(prefs) {
        Some(m) => m,
        None => return CodexShape::Missing,
    };
    if let Some(section) = map.get(keys::CODEX).filter(|v| !v.is_null()) {
        // A null env member counts as absent, matching what truthiness
        // probing did before the rename.
        if let Some(env) = section.get(keys::ENV).filter(|v| !v.is_null()) {
            return CodexShape::Nested(env.clone());
        }
        return CodexShape::Bare(section.clone());
    }
    match map.get(keys::LEGACY_CODEX_CLI).filter(|v| !v.is_null()) {
        Some(legacy) => CodexShape::LegacyTopLevel(legacy.clone()),
        None => CodexShape::Missing,
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Decide whether a stored credentials value represents a configured
/// credential object. Empty placeholders are rendered but never persisted.
pub fn meaningful_credentials(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        Value::Object(map) => !map.is_empty(),
        _ => true,
    }
}

pub fn resolve_claude_code(prefs: Option<&Value>) -> ClaudeCodeConfig {
    match classify_claude_code(prefs) {
        ClaudeCodeShape::Current(obj) => ClaudeCodeConfig {
            env: obj
                .get(keys::ENV)
                .filter(|v| !v.is_null())
                .cloned()
                .unwrap_or_else(|| Value::Object(Map::new())),
            credentials: obj.get(keys::CREDENTIALS).cloned().unwrap_or(Value::Null),
        },
        ClaudeCodeShape::LegacyFlat(obj) => {
            let mut env = obj;
            let credentials = match env.remove(keys::CREDENTIALS) {
                Some(v) if meaningful_credentials(&v) => v,
                _ => Value::Null,
            };
            ClaudeCodeConfig {
                env: Value::Object(env),
                credentials,
            }
        }
        ClaudeCodeShape::Missing => ClaudeCodeConfig {
            env: default_claude_env(),
            credentials: default_claude_credentials(),
        },
    }
}

pub fn resolve_codex(prefs: Option<&Value>) -> CodexConfig {
    let env = match classify_codex(prefs) {
        CodexShape::Nested(env) => env,
        CodexShape::Bare(value) | CodexShape::LegacyTopLevel(value) => value,
        CodexShape::Missing => default_codex_env(),
    };
    CodexConfig { env }
}

/// Indented JSON text for the editor buffers.
pub fn to_editor_json(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_default()
}
