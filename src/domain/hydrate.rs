//! Best-effort population of entities from loosely-typed property bags.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::domain::error::ClientError;

/// Schema-aware assignment for an entity kind.
pub trait Hydrate {
    /// Assign `value` to the schema field named `key`.
    ///
    /// Returns `Ok(false)` when `key` is not part of the schema, so the caller
    /// can keep the value in the entity's [`Extensions`].
    fn assign(&mut self, key: &str, value: &Value) -> Result<bool, ClientError>;

    fn extensions_mut(&mut self) -> &mut Extensions;
}

/// Populate `target` from `bag`.
///
/// Setter failures are logged and discarded per field; unknown keys are kept
/// as read-only extensions.
pub fn hydrate<T: Hydrate + ?Sized>(target: &mut T, bag: &Map<String, Value>) {
    for (key, value) in bag {
        match target.assign(key, value) {
            Ok(true) => {}
            Ok(false) => target.extensions_mut().insert(key.clone(), value.clone()),
            Err(err) => tracing::debug!(field = %key, error = %err, "skipped field during hydration"),
        }
    }
}

/// Server fields not modelled by an entity's schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Extensions(Map<String, Value>);

impl Extensions {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn insert(&mut self, key: String, value: Value) {
        self.0.insert(key, value);
    }
}

/// Write-once identifier assignment shared by every entity kind.
pub(crate) fn assign_id(slot: &mut Option<u64>, value: &Value) -> Result<(), ClientError> {
    let id = match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
    .ok_or_else(|| ClientError::invalid_field("id", format!("expected an integer, got {value}")))?;

    match *slot {
        Some(existing) if existing != id => Err(ClientError::invalid_field(
            "id",
            format!("identifier {existing} cannot be replaced by {id}"),
        )),
        _ => {
            *slot = Some(id);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[derive(Default)]
    struct Sample {
        id: Option<u64>,
        name: Option<String>,
        extensions: Extensions,
    }

    impl Hydrate for Sample {
        fn assign(&mut self, key: &str, value: &Value) -> Result<bool, ClientError> {
            match key {
                "id" => assign_id(&mut self.id, value)?,
                "name" => {
                    let name = value
                        .as_str()
                        .ok_or_else(|| ClientError::invalid_field("name", "expected a string"))?;
                    self.name = Some(name.to_string());
                }
                _ => return Ok(false),
            }
            Ok(true)
        }

        fn extensions_mut(&mut self) -> &mut Extensions {
            &mut self.extensions
        }
    }

    fn bag(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    #[test]
    fn unknown_keys_land_in_extensions() {
        let mut sample = Sample::default();
        hydrate(&mut sample, &bag(json!({"id": 4, "name": "a", "url": "https://x"})));

        assert_eq!(sample.id, Some(4));
        assert_eq!(sample.name.as_deref(), Some("a"));
        assert_eq!(sample.extensions.get("url"), Some(&json!("https://x")));
        assert_eq!(sample.extensions.len(), 1);
    }

    #[test]
    fn setter_failures_are_swallowed() {
        let mut sample = Sample::default();
        hydrate(&mut sample, &bag(json!({"name": 12, "id": 9})));

        assert_eq!(sample.name, None);
        assert_eq!(sample.id, Some(9));
        assert!(sample.extensions.is_empty());
    }

    #[test]
    fn id_cannot_be_replaced() {
        let mut slot = Some(3);
        assert!(assign_id(&mut slot, &json!(3)).is_ok());
        assert!(assign_id(&mut slot, &json!(4)).is_err());
        assert_eq!(slot, Some(3));
    }
}
