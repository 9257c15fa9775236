mod coerce;

#[cfg(test)]
mod tests;

use derive_more::Display;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{collections::BTreeMap, str::FromStr};
use thiserror::Error as ThisError;

pub use coerce::{CoerceError, coerce};

///
/// Value
///
/// Owned runtime value for document fields. This is the input vocabulary of
/// the compiler: operands in predicates, field values in partial documents.
/// Storage representation is a separate concern, see [`StorageValue`].
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Blob(Vec<u8>),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
}

impl Value {
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Textual rendering used by `TEXT` coercion.
    ///
    /// Text passes through unquoted; every other variant renders as its
    /// canonical JSON form.
    #[must_use]
    pub fn to_text(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            other => serde_json::Value::from(other.clone()).to_string(),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Self::Blob(value)
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(flag) => Self::Bool(flag),
            serde_json::Value::Number(number) => number.as_i64().map_or_else(
                || Self::Float(number.as_f64().unwrap_or(f64::NAN)),
                Self::Int,
            ),
            serde_json::Value::String(text) => Self::Text(text),
            serde_json::Value::Array(items) => {
                Self::List(items.into_iter().map(Self::from).collect())
            }
            serde_json::Value::Object(entries) => Self::Map(
                entries
                    .into_iter()
                    .map(|(key, item)| (key, Self::from(item)))
                    .collect(),
            ),
        }
    }
}

impl From<Value> for serde_json::Value {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(flag) => Self::Bool(flag),
            Value::Int(number) => Self::from(number),
            Value::Float(number) => {
                serde_json::Number::from_f64(number).map_or(Self::Null, Self::Number)
            }
            Value::Text(text) => Self::String(text),
            Value::Blob(bytes) => Self::Array(bytes.into_iter().map(Self::from).collect()),
            Value::List(items) => Self::Array(items.into_iter().map(Self::from).collect()),
            Value::Map(entries) => Self::Object(
                entries
                    .into_iter()
                    .map(|(key, item)| (key, Self::from(item)))
                    .collect(),
            ),
        }
    }
}

///
/// StorageType
///
/// Declared column type for a promoted document field. Parsing accepts the
/// SQL-ish names case-insensitively so schemas can be wire-defined; anything
/// unrecognized fails with [`UnsupportedStorageType`].
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum StorageType {
    #[display("TEXT")]
    Text,

    #[display("INTEGER")]
    Integer,

    #[display("REAL")]
    Real,

    #[display("BLOB")]
    Blob,

    #[display("BOOLEAN")]
    Boolean,
}

impl FromStr for StorageType {
    type Err = UnsupportedStorageType;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.to_ascii_uppercase().as_str() {
            "TEXT" => Ok(Self::Text),
            "INTEGER" => Ok(Self::Integer),
            "REAL" => Ok(Self::Real),
            "BLOB" => Ok(Self::Blob),
            "BOOLEAN" => Ok(Self::Boolean),
            _ => Err(UnsupportedStorageType {
                name: input.to_string(),
            }),
        }
    }
}

impl Serialize for StorageType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for StorageType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;

        name.parse().map_err(serde::de::Error::custom)
    }
}

///
/// UnsupportedStorageType
///
/// A schema entry declared a storage type the coercion rules do not
/// recognize.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[error("unsupported storage type '{name}'")]
pub struct UnsupportedStorageType {
    pub name: String,
}

///
/// StorageValue
///
/// Native parameter value handed to the relational engine. Booleans are
/// always stored as integers `0`/`1`; there is no boolean variant.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub enum StorageValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl StorageValue {
    /// Schema-less pass-through mapping, keyed by the value's own runtime
    /// type. Used for ad-hoc predicates and identity/payload slots where no
    /// storage type is declared.
    #[must_use]
    pub fn from_natural(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(flag) => Self::Integer(i64::from(*flag)),
            Value::Int(number) => Self::Integer(*number),
            Value::Float(number) => Self::Real(*number),
            Value::Text(text) => Self::Text(text.clone()),
            Value::Blob(bytes) => Self::Blob(bytes.clone()),
            composite @ (Value::List(_) | Value::Map(_)) => Self::Text(composite.to_text()),
        }
    }
}
