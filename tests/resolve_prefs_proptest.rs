//! Property-based checks for the preferences resolver and the save path.
//!
//! The resolver must accept any JSON document a decade of clients may have
//! written, and a save must normalize it so that further saves without edits
//! change nothing.

use proptest::option;
use proptest::prelude::*;
use serde_json::{Map, Value};

use agent_settings::settings::schema::{
    meaningful_credentials, resolve_claude_code, resolve_codex,
};
use agent_settings::settings::SettingsForm;

/// Arbitrary JSON values of bounded depth.
fn json_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        "[a-zA-Z0-9_]{0,8}".prop_map(Value::String),
    ];
    leaf.prop_recursive(3, 16, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map("[A-Z_]{1,10}", inner, 0..4)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

/// Preferences documents: optional agent sections of any shape plus
/// unrelated keys that must survive saves untouched.
fn prefs_doc() -> impl Strategy<Value = Value> {
    (
        option::of(json_value()),
        option::of(json_value()),
        option::of(json_value()),
        prop::collection::btree_map("[a-z]{1,6}", json_value(), 0..3),
    )
        .prop_map(|(claude, codex, legacy, extra)| {
            let mut map = Map::new();
            for (k, v) in extra {
                map.insert(k, v);
            }
            if let Some(v) = claude {
                map.insert("claudeCode".into(), v);
            }
            if let Some(v) = codex {
                map.insert("codex".into(), v);
            }
            if let Some(v) = legacy {
                map.insert("codexCLI".into(), v);
            }
            Value::Object(map)
        })
}

fn save(doc: &Value) -> Value {
    let form = SettingsForm::from_preferences(Some(doc));
    form.build_preferences(Some(doc))
        .expect("buffers seeded by the resolver always parse")
}

proptest! {
    /// One save normalizes; a second save without edits is a no-op.
    #[test]
    fn saved_documents_are_fixpoints(doc in prefs_doc()) {
        let saved = save(&doc);
        let saved_again = save(&saved);
        prop_assert_eq!(saved, saved_again);
    }

    /// Whatever the stored shape, both env values resolve to something.
    #[test]
    fn resolved_env_is_never_null(doc in prefs_doc()) {
        prop_assert!(!resolve_claude_code(Some(&doc)).env.is_null());
        prop_assert!(!resolve_codex(Some(&doc)).env.is_null());
    }

    /// Persisted credentials are null or meaningful, never an empty
    /// placeholder.
    #[test]
    fn persisted_credentials_are_null_or_meaningful(doc in prefs_doc()) {
        let saved = save(&doc);
        let credentials = &saved["claudeCode"]["credentials"];
        prop_assert!(credentials.is_null() || meaningful_credentials(credentials));
    }

    /// The pre-rename Codex key is dropped by every save, and unrelated
    /// preference keys are preserved verbatim.
    #[test]
    fn saves_drop_legacy_key_and_keep_unrelated_keys(doc in prefs_doc()) {
        let saved = save(&doc);
        prop_assert!(saved.get("codexCLI").is_none());

        for (key, value) in doc.as_object().into_iter().flatten() {
            if key != "claudeCode" && key != "codex" && key != "codexCLI" {
                prop_assert_eq!(saved.get(key), Some(value));
            }
        }
    }
}
