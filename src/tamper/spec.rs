//! Modification spec definitions.
//!
//! A [`TamperSpec`] is what callers send (inside a tagged URL or a pattern
//! registration) and what the store hands back. All fields are defaulted so a
//! partial JSON or TOML object deserializes into a complete spec.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::tamper::key::CompositeKey;

/// Ordered header-name → value mapping.
///
/// A `None` value is the "remove this header" marker; normalization moves
/// those entries into the matching `remove` list. Iteration order is the
/// order entries were written in, which is the order new headers get
/// appended to a request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderTable(Vec<(String, Option<String>)>);

impl HeaderTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the entry with exactly this name.
    pub fn insert(&mut self, name: impl Into<String>, value: Option<String>) {
        let name = name.into();
        match self.0.iter_mut().find(|(existing, _)| *existing == name) {
            Some(entry) => entry.1 = value,
            None => self.0.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<Option<&str>> {
        self.0
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value.as_deref())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.0.iter().map(|(name, value)| (name.as_str(), value.as_deref()))
    }

    /// Entries carrying a value to set, skipping removal markers.
    pub fn values(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .filter_map(|(name, value)| value.as_deref().map(|v| (name.as_str(), v)))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Drop every removal marker, returning the names that carried one.
    pub(crate) fn take_removals(&mut self) -> Vec<String> {
        let mut removed = Vec::new();
        self.0.retain(|(name, value)| {
            if value.is_none() {
                removed.push(name.clone());
                false
            } else {
                true
            }
        });
        removed
    }
}

impl<K: Into<String>> FromIterator<(K, Option<String>)> for HeaderTable {
    fn from_iter<I: IntoIterator<Item = (K, Option<String>)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (name, value) in iter {
            table.insert(name, value);
        }
        table
    }
}

impl Serialize for HeaderTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, value) in &self.0 {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for HeaderTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TableVisitor;

        impl<'de> Visitor<'de> for TableVisitor {
            type Value = HeaderTable;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of header names to string or null")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut table = HeaderTable::new();
                while let Some((name, value)) = access.next_entry::<String, Option<String>>()? {
                    table.insert(name, value);
                }
                Ok(table)
            }
        }

        deserializer.deserialize_map(TableVisitor)
    }
}

/// Header changes for one phase of a request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeaderChanges {
    #[serde(deserialize_with = "null_as_default")]
    pub headers: HeaderTable,
    #[serde(deserialize_with = "null_as_default")]
    pub remove: Vec<String>,
}

impl HeaderChanges {
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty() && self.remove.is_empty()
    }
}

/// Behavioural options attached to a spec.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TamperOptions {
    /// Discard the spec on the first terminal (non-redirect) response.
    pub once: bool,
}

/// Declarative header modifications for a request and its response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TamperSpec {
    /// Request headers to set (or, with a null value, to remove).
    #[serde(deserialize_with = "null_as_default")]
    pub headers: HeaderTable,

    /// Request header names to remove, applied after `headers`.
    #[serde(deserialize_with = "null_as_default")]
    pub remove: Vec<String>,

    /// Changes applied to the response headers.
    #[serde(deserialize_with = "null_as_default")]
    pub response: HeaderChanges,

    #[serde(deserialize_with = "null_as_default")]
    pub options: TamperOptions,

    /// Host request identifier, bound once request headers are sent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,

    /// Key the store currently files this spec under.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<CompositeKey>,
}

impl TamperSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name, Some(value.into()));
        self
    }

    /// Record a null entry, which normalization turns into a removal.
    pub fn unset_header(mut self, name: impl Into<String>) -> Self {
        self.headers.insert(name, None);
        self
    }

    pub fn remove_header(mut self, name: impl Into<String>) -> Self {
        self.remove.push(name.into());
        self
    }

    pub fn set_response_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.response.headers.insert(name, Some(value.into()));
        self
    }

    pub fn remove_response_header(mut self, name: impl Into<String>) -> Self {
        self.response.remove.push(name.into());
        self
    }

    pub fn once(mut self) -> Self {
        self.options.once = true;
        self
    }
}

/// Treat an explicit `null` the same as an absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}
