//! Normalization of loosely-typed input into schema fields.

use serde::Serialize;
use serde_json::{Map, Value};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::domain::calendar::Calendar;
use crate::domain::cms::Category;
use crate::domain::error::ClientError;
use crate::domain::forums::{Forum, Topic};
use crate::domain::groups::Group;
use crate::domain::hydrate::{Hydrate, hydrate};
use crate::domain::members::Member;

/// An entity kind that other entities can point at by id.
pub trait Reference: Hydrate + Sized {
    /// What a fresh instance needs to exist: the client, a database, or nothing.
    type Scope: ?Sized;

    fn blank(scope: &Self::Scope) -> Self;

    fn reference_id(&self) -> Option<u64>;
}

/// The three shapes a reference field accepts.
#[derive(Debug, Clone)]
pub enum RefInput<T> {
    Instance(T),
    Bag(Map<String, Value>),
    Id(u64),
}

impl<T: Reference> RefInput<T> {
    /// Interpret raw JSON: an object carrying `id`, or a bare integer.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Object(bag) if bag.get("id").is_some_and(|id| !id.is_null()) => {
                Some(Self::Bag(bag.clone()))
            }
            Value::Number(n) => n.as_u64().map(Self::Id),
            _ => None,
        }
    }

    pub fn resolve(self, scope: &T::Scope) -> T {
        match self {
            Self::Instance(instance) => instance,
            Self::Bag(bag) => {
                let mut instance = T::blank(scope);
                hydrate(&mut instance, &bag);
                instance
            }
            Self::Id(id) => {
                let mut instance = T::blank(scope);
                let mut bag = Map::new();
                bag.insert("id".to_string(), Value::from(id));
                hydrate(&mut instance, &bag);
                instance
            }
        }
    }
}

macro_rules! reference_inputs {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for RefInput<$ty> {
                fn from(value: $ty) -> Self {
                    RefInput::Instance(value)
                }
            }

            impl From<u64> for RefInput<$ty> {
                fn from(value: u64) -> Self {
                    RefInput::Id(value)
                }
            }

            impl From<Map<String, Value>> for RefInput<$ty> {
                fn from(value: Map<String, Value>) -> Self {
                    RefInput::Bag(value)
                }
            }
        )*
    };
}

reference_inputs!(Member, Group, Forum, Topic, Category, Calendar);

/// Ordered list of distinct tags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Tags(Vec<String>);

impl Tags {
    /// Split a comma-separated list.
    pub fn parse(raw: &str) -> Self {
        raw.split(',').collect()
    }

    /// Accepts an array of strings or a comma-separated string.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(Self::parse(s)),
            Value::Array(items) => Some(items.iter().filter_map(Value::as_str).collect()),
            _ => None,
        }
    }

    pub fn push(&mut self, tag: impl AsRef<str>) {
        let tag = tag.as_ref().trim();
        if !tag.is_empty() && !self.0.iter().any(|t| t == tag) {
            self.0.push(tag.to_string());
        }
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Wire form: comma-joined.
    pub fn join(&self) -> String {
        self.0.join(",")
    }
}

impl<S: AsRef<str>> FromIterator<S> for Tags {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut tags = Tags::default();
        for tag in iter {
            tags.push(tag);
        }
        tags
    }
}

impl From<&str> for Tags {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

impl From<Vec<&str>> for Tags {
    fn from(value: Vec<&str>) -> Self {
        value.into_iter().collect()
    }
}

impl From<Vec<String>> for Tags {
    fn from(value: Vec<String>) -> Self {
        value.into_iter().collect()
    }
}

pub(crate) fn read_string(field: &'static str, value: &Value) -> Result<Option<String>, ClientError> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s.clone())),
        Value::Number(n) => Ok(Some(n.to_string())),
        other => Err(ClientError::invalid_field(
            field,
            format!("expected a string, got {other}"),
        )),
    }
}

/// Truthiness as the remote API uses it: booleans, 0/1, and "0"/"1".
pub(crate) fn read_flag(field: &'static str, value: &Value) -> Result<bool, ClientError> {
    match value {
        Value::Null => Ok(false),
        Value::Bool(b) => Ok(*b),
        Value::Number(n) => Ok(n.as_f64().is_some_and(|f| f != 0.0)),
        Value::String(s) => Ok(!s.is_empty() && s != "0"),
        other => Err(ClientError::invalid_field(
            field,
            format!("expected a flag, got {other}"),
        )),
    }
}

pub(crate) fn read_int(field: &'static str, value: &Value) -> Result<Option<i64>, ClientError> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => n
            .as_i64()
            .map(Some)
            .ok_or_else(|| ClientError::invalid_field(field, format!("expected an integer, got {n}"))),
        Value::String(s) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ClientError::invalid_field(field, format!("expected an integer, got {s:?}"))),
        other => Err(ClientError::invalid_field(
            field,
            format!("expected an integer, got {other}"),
        )),
    }
}

pub(crate) fn read_datetime(
    field: &'static str,
    value: &Value,
) -> Result<Option<OffsetDateTime>, ClientError> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) if s.is_empty() => Ok(None),
        Value::String(s) => OffsetDateTime::parse(s, &Rfc3339)
            .map(Some)
            .map_err(|e| ClientError::invalid_field(field, e.to_string())),
        other => Err(ClientError::invalid_field(
            field,
            format!("expected an RFC 3339 timestamp, got {other}"),
        )),
    }
}

/// RFC 3339 wire form; unformattable values are dropped like absent ones.
pub(crate) fn datetime_param(value: Option<&OffsetDateTime>) -> Option<String> {
    value.and_then(|dt| dt.format(&Rfc3339).ok())
}
