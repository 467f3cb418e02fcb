//! JSON settings merging.
//!
//! The materializer treats `.vscode/settings.json` specially: instead of the
//! default overwrite rule, new settings are merged into the existing file
//! through a [`SettingsMerger`] collaborator. The collaborator is injected
//! and optional, so the merge behavior stays replaceable and testable.

use std::path::Path;

use serde_json::Value;

use crate::error::Result;

/// Merges new JSON content into an existing JSON file.
pub trait SettingsMerger {
    /// Read `existing_path` and merge `incoming` into it, returning the
    /// merged value. Implementations decide how conflicts resolve.
    fn merge(&self, existing_path: &Path, incoming: &Value) -> Result<Value>;
}

/// Recursive object merge: incoming keys are added, nested objects merge
/// recursively, and incoming scalars/arrays replace existing values. An
/// unreadable or invalid existing file yields the incoming value unchanged.
pub struct DeepMerger;

impl SettingsMerger for DeepMerger {
    fn merge(&self, existing_path: &Path, incoming: &Value) -> Result<Value> {
        let existing: Value = match std::fs::read_to_string(existing_path) {
            Ok(text) => match serde_json::from_str(&text) {
                Ok(value) => value,
                Err(_) => return Ok(incoming.clone()),
            },
            Err(_) => return Ok(incoming.clone()),
        };

        let mut merged = existing;
        deep_merge(&mut merged, incoming);
        Ok(merged)
    }
}

/// Recursively merge `source` into `target`. Objects merge key-by-key;
/// everything else is replaced by the source value.
pub fn deep_merge(target: &mut Value, source: &Value) {
    match (target, source) {
        (Value::Object(target_obj), Value::Object(source_obj)) => {
            for (key, source_value) in source_obj {
                if let Some(target_value) = target_obj.get_mut(key) {
                    deep_merge(target_value, source_value);
                } else {
                    target_obj.insert(key.clone(), source_value.clone());
                }
            }
        }
        (target, source) => {
            *target = source.clone();
        }
    }
}
