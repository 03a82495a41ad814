//! Records produced by an origin and the values they carry.

use std::fmt;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::query::Value;

/// A value stored in a record field or produced by evaluating an expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum Datum {
    Integer(i64),
    Text(String),
    Boolean(bool),
}

/// The tag of a [`Datum`], used in type errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatumKind {
    Integer,
    Text,
    Boolean,
}

impl fmt::Display for DatumKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DatumKind::Integer => "integer",
            DatumKind::Text => "text",
            DatumKind::Boolean => "boolean",
        };
        f.write_str(name)
    }
}

impl Datum {
    pub fn kind(&self) -> DatumKind {
        match self {
            Datum::Integer(_) => DatumKind::Integer,
            Datum::Text(_) => DatumKind::Text,
            Datum::Boolean(_) => DatumKind::Boolean,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Datum::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Builds a text datum from an optional remote value; missing values become `""`.
    pub fn text_or_empty<S: AsRef<str>>(value: Option<S>) -> Self {
        Datum::Text(value.map(|s| s.as_ref().to_string()).unwrap_or_default())
    }

    /// Builds a text datum by joining a list with commas.
    pub fn joined<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let parts: Vec<String> = items.into_iter().map(|s| s.as_ref().to_string()).collect();
        Datum::Text(parts.join(","))
    }
}

impl fmt::Display for Datum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Datum::Integer(n) => write!(f, "{}", n),
            Datum::Text(s) => f.write_str(s),
            Datum::Boolean(b) => write!(f, "{}", b),
        }
    }
}

impl From<Value> for Datum {
    fn from(value: Value) -> Self {
        match value {
            Value::Integer(n) => Datum::Integer(n),
            Value::Text(s) => Datum::Text(s),
        }
    }
}

impl From<&Value> for Datum {
    fn from(value: &Value) -> Self {
        value.clone().into()
    }
}

impl From<i64> for Datum {
    fn from(n: i64) -> Self {
        Datum::Integer(n)
    }
}

impl From<u64> for Datum {
    /// Counters above `i64::MAX` saturate.
    fn from(n: u64) -> Self {
        Datum::Integer(i64::try_from(n).unwrap_or(i64::MAX))
    }
}

impl From<bool> for Datum {
    fn from(b: bool) -> Self {
        Datum::Boolean(b)
    }
}

impl From<&str> for Datum {
    fn from(s: &str) -> Self {
        Datum::Text(s.to_string())
    }
}

impl From<String> for Datum {
    fn from(s: String) -> Self {
        Datum::Text(s)
    }
}

/// One row of a source: field names mapped to values, in insertion order.
///
/// Records are small (a dozen fields), so lookups scan a vector instead of hashing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(String, Datum)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Datum>) -> Self {
        self.insert(name, value);
        self
    }

    /// Sets a field, replacing an existing value in place.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Datum>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Datum> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, value)| value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Datum)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// Returns a record holding only `columns`, in the order given.
    ///
    /// Columns absent from this record are skipped.
    pub fn project<S: AsRef<str>>(&self, columns: &[S]) -> Record {
        let fields = columns
            .iter()
            .filter_map(|column| {
                let name = column.as_ref();
                self.get(name).map(|value| (name.to_string(), value.clone()))
            })
            .collect();
        Record { fields }
    }
}

impl FromIterator<(String, Datum)> for Record {
    fn from_iter<T: IntoIterator<Item = (String, Datum)>>(iter: T) -> Self {
        let mut record = Record::new();
        for (name, value) in iter {
            record.insert(name, value);
        }
        record
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
