//! Per-collection column schema.
//!
//! A schema names the document fields promoted to real typed columns; every
//! other field lives only in the opaque payload column. Schemas are supplied
//! once at collection setup and are immutable afterwards.

mod extract;


use crate::{
    config::{Environment, StoreDefaults},
    value::{StorageType, UnsupportedStorageType},
};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use thiserror::Error as ThisError;

pub use extract::{Document, ExtractError, extract, resolve_path};

///
/// FieldPath
///
/// A dot-separated document path, compiled once at schema construction into
/// its segment list and physical column name (`a.b.c` -> `a_b_c`). Valid by
/// construction; the compiled form is reused on every call.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FieldPath {
    raw: String,
    segments: Vec<String>,
    column: String,
}

impl FieldPath {
    pub fn parse(raw: impl Into<String>) -> Result<Self, SchemaError> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(SchemaError::EmptyFieldPath);
        }

        let segments: Vec<String> = raw.split('.').map(str::to_string).collect();
        if segments.iter().any(String::is_empty) {
            return Err(SchemaError::EmptySegment { path: raw });
        }

        let column = raw.replace('.', "_");

        Ok(Self {
            raw,
            segments,
            column,
        })
    }

    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Physical column name for this path.
    #[must_use]
    pub fn column(&self) -> &str {
        &self.column
    }

    #[must_use]
    pub fn is_nested(&self) -> bool {
        self.segments.len() > 1
    }
}

impl Serialize for FieldPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for FieldPath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;

        Self::parse(raw).map_err(serde::de::Error::custom)
    }
}

///
/// ColumnSpec
///
/// One promoted document field and its declared storage type.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ColumnSpec {
    pub path: FieldPath,
    pub storage: StorageType,
}

///
/// CollectionSchema
///
/// Immutable description of one collection: its table name, promoted
/// columns, and reserved physical columns. Built with
/// [`CollectionSchema::builder`]; construction is the only place invariants
/// are checked, so every accessor afterwards is infallible.
///

#[derive(Clone, Debug)]
pub struct CollectionSchema {
    table: String,
    columns: BTreeMap<String, ColumnSpec>,
    identity_column: String,
    payload_column: String,
    created_column: String,
    updated_column: String,
    timestamps: bool,
}

impl CollectionSchema {
    #[must_use]
    pub fn builder(table: impl Into<String>) -> CollectionSchemaBuilder {
        CollectionSchemaBuilder::new(table)
    }

    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Promoted columns in schema iteration order (deterministic).
    pub fn columns(&self) -> impl Iterator<Item = &ColumnSpec> {
        self.columns.values()
    }

    /// Look up a promoted column by raw field path.
    #[must_use]
    pub fn column(&self, path: &str) -> Option<&ColumnSpec> {
        self.columns.get(path)
    }

    #[must_use]
    pub fn identity_column(&self) -> &str {
        &self.identity_column
    }

    #[must_use]
    pub fn payload_column(&self) -> &str {
        &self.payload_column
    }

    #[must_use]
    pub fn created_column(&self) -> &str {
        &self.created_column
    }

    #[must_use]
    pub fn updated_column(&self) -> &str {
        &self.updated_column
    }

    #[must_use]
    pub const fn timestamps(&self) -> bool {
        self.timestamps
    }

    fn reserved_columns(&self) -> [&str; 4] {
        [
            &self.identity_column,
            &self.payload_column,
            &self.created_column,
            &self.updated_column,
        ]
    }
}

///
/// CollectionSchemaBuilder
///
/// Consuming builder. Column and naming errors are deferred to `build` so
/// chains stay fluent.
///

#[derive(Debug)]
pub struct CollectionSchemaBuilder {
    table: String,
    columns: Vec<(String, Result<StorageType, UnsupportedStorageType>)>,
    identity_column: String,
    payload_column: String,
    created_column: String,
    updated_column: String,
    timestamps: bool,
}

impl CollectionSchemaBuilder {
    fn new(table: impl Into<String>) -> Self {
        let defaults = StoreDefaults::for_env(Environment::default());

        Self {
            table: table.into(),
            columns: Vec::new(),
            identity_column: defaults.identity_column.to_string(),
            payload_column: defaults.payload_column.to_string(),
            created_column: defaults.created_column.to_string(),
            updated_column: defaults.updated_column.to_string(),
            timestamps: defaults.timestamps,
        }
    }

    /// Promote a document field to a typed column.
    #[must_use]
    pub fn column(mut self, path: impl Into<String>, storage: StorageType) -> Self {
        self.columns.push((path.into(), Ok(storage)));
        self
    }

    /// Promote a field with a storage type given by name, as wire-defined
    /// schemas do. Unrecognized names fail at `build`.
    #[must_use]
    pub fn column_parsed(mut self, path: impl Into<String>, storage: &str) -> Self {
        self.columns.push((path.into(), storage.parse()));
        self
    }

    #[must_use]
    pub fn identity_column(mut self, name: impl Into<String>) -> Self {
        self.identity_column = name.into();
        self
    }

    #[must_use]
    pub fn payload_column(mut self, name: impl Into<String>) -> Self {
        self.payload_column = name.into();
        self
    }

    #[must_use]
    pub fn created_column(mut self, name: impl Into<String>) -> Self {
        self.created_column = name.into();
        self
    }

    #[must_use]
    pub fn updated_column(mut self, name: impl Into<String>) -> Self {
        self.updated_column = name.into();
        self
    }

    #[must_use]
    pub const fn timestamps(mut self, enabled: bool) -> Self {
        self.timestamps = enabled;
        self
    }

    pub fn build(self) -> Result<CollectionSchema, SchemaError> {
        if self.table.is_empty() {
            return Err(SchemaError::EmptyTableName);
        }

        let mut schema = CollectionSchema {
            table: self.table,
            columns: BTreeMap::new(),
            identity_column: self.identity_column,
            payload_column: self.payload_column,
            created_column: self.created_column,
            updated_column: self.updated_column,
            timestamps: self.timestamps,
        };

        let mut by_column: BTreeMap<String, String> = BTreeMap::new();
        for (raw, storage) in self.columns {
            let path = FieldPath::parse(raw)?;
            let storage = storage?;

            if let Some(reserved) = schema
                .reserved_columns()
                .into_iter()
                .find(|name| *name == path.column())
            {
                return Err(SchemaError::ReservedColumn {
                    path: path.raw().to_string(),
                    column: reserved.to_string(),
                });
            }

            if let Some(other) = by_column.get(path.column()) {
                if other == path.raw() {
                    return Err(SchemaError::DuplicateColumn {
                        path: path.raw().to_string(),
                    });
                }
                return Err(SchemaError::ColumnCollision {
                    left: other.clone(),
                    right: path.raw().to_string(),
                    column: path.column().to_string(),
                });
            }
            by_column.insert(path.column().to_string(), path.raw().to_string());

            schema
                .columns
                .insert(path.raw().to_string(), ColumnSpec { path, storage });
        }

        Ok(schema)
    }
}

///
/// SchemaError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum SchemaError {
    #[error("table name must be non-empty")]
    EmptyTableName,

    #[error("field path must be non-empty")]
    EmptyFieldPath,

    #[error("field path '{path}' contains an empty segment")]
    EmptySegment { path: String },

    #[error("field path '{path}' is declared more than once")]
    DuplicateColumn { path: String },

    #[error("field paths '{left}' and '{right}' flatten to the same column '{column}'")]
    ColumnCollision {
        left: String,
        right: String,
        column: String,
    },

    #[error("field path '{path}' collides with the reserved column '{column}'")]
    ReservedColumn { path: String, column: String },

    #[error(transparent)]
    UnsupportedStorageType(#[from] UnsupportedStorageType),
}
