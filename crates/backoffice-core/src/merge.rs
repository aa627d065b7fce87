//! # Merge Policy
//!
//! Folds a backend response into the typed settings of a store.
//!
//! ## Rules (applied per top-level key)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Key present in both response and current settings?                     │
//! │       │                                                                 │
//! │       ├── no  → ignored (reported in MergeReport::ignored)             │
//! │       │                                                                 │
//! │       └── yes → response value is ...                                   │
//! │                  ├── array      → replace wholesale                     │
//! │                  ├── object     → shallow-merge field by field          │
//! │                  │                (replace if current is not an object) │
//! │                  └── primitive  → replace                               │
//! │                                                                         │
//! │  Nested objects two levels deep are NOT merged recursively: a field     │
//! │  inside a section is replaced with whatever the response carries.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The merged JSON is deserialized back into the schema type. If that fails
//! the caller gets an error and keeps its previous settings, so a response
//! is either applied completely or not at all.

use serde_json::{Map, Value};

use crate::error::{CoreError, CoreResult};
use crate::schema::SettingsSchema;

/// What a merge touched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// Top-level keys that were applied.
    pub merged: Vec<String>,
    /// Top-level keys the response carried but the schema does not know.
    pub ignored: Vec<String>,
}

impl MergeReport {
    pub fn is_empty(&self) -> bool {
        self.merged.is_empty()
    }
}

/// Applies the shallow merge policy to raw JSON maps.
pub fn shallow_merge(current: &mut Map<String, Value>, incoming: &Map<String, Value>) -> MergeReport {
    let mut report = MergeReport::default();

    for (key, value) in incoming {
        let Some(slot) = current.get_mut(key) else {
            report.ignored.push(key.clone());
            continue;
        };

        match (slot, value) {
            (Value::Object(existing), Value::Object(fields)) => {
                for (field, field_value) in fields {
                    existing.insert(field.clone(), field_value.clone());
                }
            }
            (slot, value) => *slot = value.clone(),
        }

        report.merged.push(key.clone());
    }

    report
}

/// Returns the part of a response body that carries settings.
///
/// Most endpoints wrap settings as `{ "settings": {...}, "message": "..." }`.
/// Some return the settings object bare; in that case the whole body is used
/// and envelope keys like `message` fall out as ignored keys.
pub fn settings_payload(body: &Value) -> &Value {
    match body.get("settings") {
        Some(settings) if !settings.is_null() => settings,
        _ => body,
    }
}

/// Merges `incoming` into a copy of `current` and returns the new settings.
///
/// `current` is never modified; the caller swaps the result in on success.
pub fn merge_settings<S: SettingsSchema>(current: &S, incoming: &Value) -> CoreResult<(S, MergeReport)> {
    let Value::Object(incoming) = incoming else {
        return Err(CoreError::InvalidPayload(format!(
            "expected an object for {} settings, got {}",
            S::DOMAIN,
            json_kind(incoming)
        )));
    };

    let mut merged = match serde_json::to_value(current) {
        Ok(Value::Object(map)) => map,
        Ok(other) => {
            return Err(CoreError::MergeFailed {
                domain: S::DOMAIN.to_string(),
                reason: format!("schema serializes to {}", json_kind(&other)),
            })
        }
        Err(e) => {
            return Err(CoreError::MergeFailed {
                domain: S::DOMAIN.to_string(),
                reason: e.to_string(),
            })
        }
    };

    let report = shallow_merge(&mut merged, incoming);

    let settings = serde_json::from_value(Value::Object(merged)).map_err(|e| CoreError::MergeFailed {
        domain: S::DOMAIN.to_string(),
        reason: e.to_string(),
    })?;

    Ok((settings, report))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::finance::FinanceSettings;
    use crate::schema::notifications::NotificationSettings;
    use serde_json::json;

    fn as_map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn test_arrays_replace_wholesale() {
        let mut current = as_map(json!({ "tags": ["a", "b", "c"] }));
        shallow_merge(&mut current, &as_map(json!({ "tags": ["z"] })));
        assert_eq!(current["tags"], json!(["z"]));
    }

    #[test]
    fn test_objects_merge_one_level() {
        let mut current = as_map(json!({
            "tax": { "rate": 5, "inclusive": false, "nested": { "a": 1, "b": 2 } }
        }));
        shallow_merge(
            &mut current,
            &as_map(json!({ "tax": { "rate": 8, "nested": { "a": 9 } } })),
        );

        assert_eq!(current["tax"]["rate"], json!(8));
        assert_eq!(current["tax"]["inclusive"], json!(false));
        // Second level replaced, not merged
        assert_eq!(current["tax"]["nested"], json!({ "a": 9 }));
    }

    #[test]
    fn test_primitives_replace_and_unknown_keys_ignored() {
        let mut current = as_map(json!({ "threshold": 5 }));
        let report = shallow_merge(&mut current, &as_map(json!({ "threshold": 10, "legacy": true })));

        assert_eq!(current["threshold"], json!(10));
        assert!(!current.contains_key("legacy"));
        assert_eq!(report.merged, vec!["threshold".to_string()]);
        assert_eq!(report.ignored, vec!["legacy".to_string()]);
    }

    #[test]
    fn test_settings_payload_prefers_envelope() {
        let body = json!({ "settings": { "a": 1 }, "message": "ok" });
        assert_eq!(settings_payload(&body), &json!({ "a": 1 }));

        let bare = json!({ "a": 1 });
        assert_eq!(settings_payload(&bare), &bare);
    }

    #[test]
    fn test_merge_settings_typed() {
        let current = NotificationSettings::default();
        let (merged, report) = merge_settings(
            &current,
            &json!({ "lowStockThreshold": 12, "sms": { "enabled": true } }),
        )
        .unwrap();

        assert_eq!(merged.low_stock_threshold, 12);
        assert!(merged.sms.enabled);
        // Untouched sms fields survive the shallow merge
        assert_eq!(merged.sms.phone_number, current.sms.phone_number);
        assert_eq!(report.merged.len(), 2);
    }

    #[test]
    fn test_merge_settings_type_mismatch_fails() {
        let current = FinanceSettings::default();
        let result = merge_settings(&current, &json!({ "tax": { "ratePercent": "high" } }));
        assert!(matches!(result, Err(CoreError::MergeFailed { .. })));
    }

    #[test]
    fn test_merge_settings_rejects_non_object() {
        let current = FinanceSettings::default();
        let result = merge_settings(&current, &json!([1, 2, 3]));
        assert!(matches!(result, Err(CoreError::InvalidPayload(_))));
    }
}
