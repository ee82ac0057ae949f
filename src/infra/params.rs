//! Query-string parameter bag used by every request.
//!
//! The remote API reads all parameters from the query string, including for
//! POST and DELETE, and expects nested values in PHP bracket notation
//! (`fields[3]=x`, `customFields[0][name]=y`).

use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params(Map<String, Value>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Record an optional value; `None` is kept as null and dropped on the wire.
    pub fn set_opt<V: Into<Value>>(&mut self, key: impl Into<String>, value: Option<V>) -> &mut Self {
        let value = value.map_or(Value::Null, Into::into);
        self.0.insert(key.into(), value);
        self
    }

    /// Boolean-ish fields travel as `0` / `1`.
    pub fn flag(&mut self, key: impl Into<String>, value: bool) -> &mut Self {
        self.set(key, u8::from(value))
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Copy entries from `other` whose keys are absent or null here.
    pub fn merge_missing(&mut self, other: Params) {
        for (key, value) in other.0 {
            match self.0.get_mut(&key) {
                Some(existing) if !existing.is_null() => {}
                Some(existing) => *existing = value,
                None => {
                    self.0.insert(key, value);
                }
            }
        }
    }

    /// Flatten into `(key, value)` pairs, skipping nulls at every depth.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::with_capacity(self.0.len());
        for (key, value) in &self.0 {
            flatten_into(key, value, &mut pairs);
        }
        pairs
    }
}

fn flatten_into(key: &str, value: &Value, out: &mut Vec<(String, String)>) {
    match value {
        Value::Null => {}
        Value::Bool(b) => out.push((key.to_string(), b.to_string())),
        Value::Number(n) => out.push((key.to_string(), n.to_string())),
        Value::String(s) => out.push((key.to_string(), s.clone())),
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                flatten_into(&format!("{key}[{index}]"), item, out);
            }
        }
        Value::Object(map) => {
            for (sub, item) in map {
                flatten_into(&format!("{key}[{sub}]"), item, out);
            }
        }
    }
}

impl From<Map<String, Value>> for Params {
    fn from(value: Map<String, Value>) -> Self {
        Self(value)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn nulls_are_stripped() {
        let mut params = Params::new();
        params.set("a", 1).set("b", Value::Null).set_opt::<String>("c", None);

        assert_eq!(params.query_pairs(), vec![("a".to_string(), "1".to_string())]);
    }

    #[test]
    fn nested_values_use_bracket_notation() {
        let mut params = Params::new();
        params.set("fields", json!({"3": "Title", "4": null}));
        params.set("groups", json!([7, 9]));

        assert_eq!(
            params.query_pairs(),
            vec![
                ("fields[3]".to_string(), "Title".to_string()),
                ("groups[0]".to_string(), "7".to_string()),
                ("groups[1]".to_string(), "9".to_string()),
            ]
        );
    }

    #[test]
    fn flags_are_numeric() {
        let mut params = Params::new();
        params.flag("hidden", true).flag("locked", false);
        assert_eq!(params.get("hidden"), Some(&json!(1)));
        assert_eq!(params.get("locked"), Some(&json!(0)));
    }

    #[test]
    fn merge_missing_keeps_existing_keys() {
        let mut params: Params = [("item_id", json!(4)), ("content", json!("hi"))]
            .into_iter()
            .collect();
        let extra: Params = [("item_id", json!(99)), ("hidden", json!(1))]
            .into_iter()
            .collect();

        params.merge_missing(extra);

        assert_eq!(params.get("item_id"), Some(&json!(4)));
        assert_eq!(params.get("hidden"), Some(&json!(1)));
        assert_eq!(params.len(), 3);
    }
}
