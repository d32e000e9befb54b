use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::passwords::engine::InputError;

/// Fields tried, in order, when naming a profile in the output mapping.
pub const KEY_FIELDS: &[&str] = &["student_id", "id", "name"];

/// A single profile field, classified once at the boundary.
///
/// Arrays keep only their string elements. Anything that is neither a string
/// nor an array lands in `Other` and is ignored by keyword extraction.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
    Other(Value),
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        match value {
            Value::String(s) => FieldValue::Text(s),
            Value::Array(items) => FieldValue::List(
                items
                    .into_iter()
                    .filter_map(|item| match item {
                        Value::String(s) => Some(s),
                        _ => None,
                    })
                    .collect(),
            ),
            other => FieldValue::Other(other),
        }
    }
}

/// A person's profile record: field name → value, in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Profile {
    fields: IndexMap<String, FieldValue>,
}

impl Profile {
    #[cfg(test)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert for fixtures.
    #[cfg(test)]
    pub fn with(mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    pub fn values(&self) -> impl Iterator<Item = &FieldValue> {
        self.fields.values()
    }

    /// Returns the identifying value used as this profile's output key, if any.
    ///
    /// Takes the first of `student_id`, `id`, `name` holding a non-blank string
    /// or a number. Numbers are rendered in decimal.
    pub fn identity(&self) -> Option<String> {
        KEY_FIELDS.iter().find_map(|field| match self.fields.get(*field)? {
            FieldValue::Text(s) if !s.trim().is_empty() => Some(s.clone()),
            FieldValue::Other(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        })
    }
}

impl From<serde_json::Map<String, Value>> for Profile {
    fn from(map: serde_json::Map<String, Value>) -> Self {
        Self {
            fields: map
                .into_iter()
                .map(|(field, value)| (field, FieldValue::from(value)))
                .collect(),
        }
    }
}

#[cfg(test)]
impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

#[cfg(test)]
impl From<Vec<&str>> for FieldValue {
    fn from(values: Vec<&str>) -> Self {
        FieldValue::List(values.into_iter().map(str::to_string).collect())
    }
}

/// A batch entry that could not be used and was left out of the output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedProfile {
    /// Zero-based position in the submitted batch.
    pub index: usize,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BatchEntry {
    Profile(Profile),
    Malformed(SkippedProfile),
}

/// The records of one generation request, classified but not yet filtered.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileBatch {
    entries: Vec<BatchEntry>,
}

impl ProfileBatch {
    /// Classifies a JSON value into a batch.
    ///
    /// Fails only when the value is not an array. Non-object elements are kept
    /// as malformed entries so the caller can report them.
    pub fn from_json(value: Value) -> Result<Self, InputError> {
        let items = match value {
            Value::Array(items) => items,
            other => {
                return Err(InputError::NotASequence {
                    found: json_kind(&other),
                })
            }
        };

        let entries = items
            .into_iter()
            .enumerate()
            .map(|(index, item)| match item {
                Value::Object(map) => BatchEntry::Profile(Profile::from(map)),
                other => BatchEntry::Malformed(SkippedProfile {
                    index,
                    reason: format!("expected an object, found {}", json_kind(&other)),
                }),
            })
            .collect();

        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_entries(self) -> Vec<BatchEntry> {
        self.entries
    }
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

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn profile(value: Value) -> Profile {
        match value {
            Value::Object(map) => Profile::from(map),
            _ => panic!("fixture must be an object"),
        }
    }

    #[test]
    fn test_field_value_classification() {
        assert_eq!(FieldValue::from(json!("Troy")), FieldValue::Text("Troy".into()));
        assert_eq!(
            FieldValue::from(json!(["chess", 3, "yoga", null])),
            FieldValue::List(vec!["chess".into(), "yoga".into()])
        );
        assert_eq!(FieldValue::from(json!(21)), FieldValue::Other(json!(21)));
        assert_eq!(
            FieldValue::from(json!({"city": "Troy"})),
            FieldValue::Other(json!({"city": "Troy"}))
        );
    }

    #[test]
    fn test_identity_prefers_student_id() {
        let p = profile(json!({"name": "Ann Lee", "id": "u-7", "student_id": "S10001"}));
        assert_eq!(p.identity().as_deref(), Some("S10001"));
    }

    #[test]
    fn test_identity_falls_through_blank_values() {
        let p = profile(json!({"student_id": "  ", "id": null, "name": "Ann Lee"}));
        assert_eq!(p.identity().as_deref(), Some("Ann Lee"));
    }

    #[test]
    fn test_identity_renders_numbers() {
        let p = profile(json!({"id": 10001}));
        assert_eq!(p.identity().as_deref(), Some("10001"));
    }

    #[test]
    fn test_identity_missing() {
        let p = profile(json!({"school": "RPI"}));
        assert!(p.identity().is_none());
    }

    #[test]
    fn test_profile_keeps_field_order() {
        let p = profile(json!({"zeta": "a", "alpha": "b", "mid": "c"}));
        let order: Vec<&str> = p.fields.keys().map(String::as_str).collect();
        assert_eq!(order, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_batch_rejects_non_array() {
        let err = ProfileBatch::from_json(json!({"name": "Ann"})).unwrap_err();
        assert!(matches!(err, InputError::NotASequence { found: "an object" }));
    }

    #[test]
    fn test_batch_records_malformed_entries() {
        let batch =
            ProfileBatch::from_json(json!([{"name": "Ann"}, 7, "x", {"name": "Bo"}])).unwrap();
        assert_eq!(batch.len(), 4);

        let malformed: Vec<SkippedProfile> = batch
            .into_entries()
            .into_iter()
            .filter_map(|e| match e {
                BatchEntry::Malformed(s) => Some(s),
                BatchEntry::Profile(_) => None,
            })
            .collect();
        assert_eq!(malformed.len(), 2);
        assert_eq!(malformed[0].index, 1);
        assert!(malformed[0].reason.contains("a number"));
        assert_eq!(malformed[1].index, 2);
        assert!(malformed[1].reason.contains("a string"));
    }

    #[test]
    fn test_empty_array_is_empty_batch() {
        let batch = ProfileBatch::from_json(json!([])).unwrap();
        assert!(batch.is_empty());
    }
}
