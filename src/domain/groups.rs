//! Member groups and profile field groups.

use serde::Serialize;
use serde_json::{Value, json};

use crate::domain::coerce::{RefInput, Reference, read_string};
use crate::domain::error::ClientError;
use crate::domain::hydrate::{Extensions, Hydrate, assign_id};

/// A member group. Read-only on the client side.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Group {
    id: Option<u64>,
    name: Option<String>,
    #[serde(rename = "formattedName")]
    formatted_name: Option<String>,
    #[serde(flatten)]
    extensions: Extensions,
}

impl Group {
    pub fn new(id: u64) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }

    pub fn id(&self) -> Option<u64> {
        self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn formatted_name(&self) -> Option<&str> {
        self.formatted_name.as_deref()
    }

    pub fn extensions(&self) -> &Extensions {
        &self.extensions
    }
}

impl Hydrate for Group {
    fn assign(&mut self, key: &str, value: &Value) -> Result<bool, ClientError> {
        match key {
            "id" => assign_id(&mut self.id, value)?,
            "name" => self.name = read_string("name", value)?,
            "formattedName" => self.formatted_name = read_string("formattedName", value)?,
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn extensions_mut(&mut self) -> &mut Extensions {
        &mut self.extensions
    }
}

impl Reference for Group {
    type Scope = ();

    fn blank(_scope: &()) -> Self {
        Self::default()
    }

    fn reference_id(&self) -> Option<u64> {
        self.id
    }
}

/// Normalize a list of groups, keeping the first occurrence of every id.
///
/// A single object or id is treated as a one-element list.
pub(crate) fn group_list(value: &Value) -> Vec<Group> {
    let items: Vec<&Value> = match value {
        Value::Array(items) => items.iter().collect(),
        other => vec![other],
    };

    let mut groups: Vec<Group> = Vec::with_capacity(items.len());
    for item in items {
        let Some(input) = RefInput::<Group>::from_value(item) else {
            continue;
        };
        let group = input.resolve(&());
        let Some(id) = group.reference_id() else {
            continue;
        };
        if !groups.iter().any(|g| g.reference_id() == Some(id)) {
            groups.push(group);
        }
    }
    groups
}

/// One custom profile field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Field {
    pub name: String,
    pub value: Value,
}

impl Field {
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A named group of custom profile fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldGroup {
    pub name: String,
    pub fields: Vec<Field>,
}

impl FieldGroup {
    pub fn new(name: impl Into<String>, fields: Vec<Field>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }

    /// Wire form: `{name, fields: [{name, value}]}`.
    pub(crate) fn to_value(&self) -> Value {
        let fields: Vec<Value> = self
            .fields
            .iter()
            .map(|field| json!({"name": field.name, "value": field.value}))
            .collect();
        json!({"name": self.name, "fields": fields})
    }

    fn from_value(value: &Value) -> Option<Self> {
        let name = value.get("name")?.as_str()?.to_string();
        let fields = entries(value.get("fields")?)?
            .filter_map(|field| {
                let name = field.get("name")?.as_str()?;
                let value = field.get("value")?;
                Some(Field::new(name, value.clone()))
            })
            .collect();
        Some(Self { name, fields })
    }
}

/// Accept both a list and the server's id-keyed object form.
fn entries(value: &Value) -> Option<Box<dyn Iterator<Item = &Value> + '_>> {
    match value {
        Value::Array(items) => Some(Box::new(items.iter())),
        Value::Object(map) => Some(Box::new(map.values())),
        _ => None,
    }
}

pub(crate) fn field_groups(value: &Value) -> Vec<FieldGroup> {
    entries(value)
        .map(|iter| iter.filter_map(FieldGroup::from_value).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn group_list_dedups_by_id_across_shapes() {
        let groups = group_list(&json!([3, {"id": 3, "name": "Members"}, {"id": 4}, "junk", 5]));
        let ids: Vec<_> = groups.iter().filter_map(Group::id).collect();
        assert_eq!(ids, vec![3, 4, 5]);
    }

    #[test]
    fn group_list_wraps_single_values() {
        assert_eq!(group_list(&json!(7)).len(), 1);
        assert_eq!(group_list(&json!({"id": 8, "name": "Mods"}))[0].name(), Some("Mods"));
        assert!(group_list(&json!(null)).is_empty());
    }

    #[test]
    fn field_groups_accept_keyed_objects() {
        let groups = field_groups(&json!({
            "1": {"name": "Personal", "fields": {"1": {"name": "About", "value": "hi"}}}
        }));
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].fields, vec![Field::new("About", "hi")]);
    }

    #[test]
    fn field_groups_skip_malformed_entries() {
        let groups = field_groups(&json!([{"name": "No fields"}, {"name": "Ok", "fields": []}]));
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].name, "Ok");
    }
}
