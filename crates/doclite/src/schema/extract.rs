use crate::{
    schema::{CollectionSchema, ColumnSpec, FieldPath},
    value::{CoerceError, StorageValue, Value, coerce},
};
use std::collections::BTreeMap;
use thiserror::Error as ThisError;

///
/// Path/field extraction
///
/// Resolves a collection's promoted field paths against a (possibly partial,
/// possibly nested) document. A field is defined only if every path segment
/// exists at runtime; a missing segment excludes the entry entirely, which is
/// what makes partial updates work: absent means "do not touch this column".
///

/// A schema-less associative document. Nested objects are `Value::Map`s.
pub type Document = BTreeMap<String, Value>;

///
/// ExtractError
///

#[derive(Clone, Debug, PartialEq, ThisError)]
pub enum ExtractError {
    #[error("field '{field}': {source}")]
    TypeMismatch { field: String, source: CoerceError },
}

/// Walk a compiled path against a document.
///
/// Returns `None` the moment any segment is missing or an intermediate value
/// is not a map. Does not recurse into values outside the declared path.
#[must_use]
pub fn resolve_path<'a>(document: &'a Document, path: &FieldPath) -> Option<&'a Value> {
    let (first, rest) = path
        .segments()
        .split_first()
        .expect("field paths have at least one segment");

    let mut current = document.get(first)?;
    for segment in rest {
        let Value::Map(entries) = current else {
            return None;
        };
        current = entries.get(segment)?;
    }

    Some(current)
}

/// Extract every defined promoted field as `(column spec, storage value)`,
/// in schema iteration order.
///
/// Present `Null` values pass through as storage nulls without coercion;
/// everything else is coerced to the column's declared storage type.
pub fn extract<'a>(
    document: &Document,
    schema: &'a CollectionSchema,
) -> Result<Vec<(&'a ColumnSpec, StorageValue)>, ExtractError> {
    let mut promoted = Vec::new();

    for spec in schema.columns() {
        let Some(value) = resolve_path(document, &spec.path) else {
            continue;
        };

        let stored = if value.is_null() {
            StorageValue::Null
        } else {
            coerce(value, spec.storage).map_err(|source| ExtractError::TypeMismatch {
                field: spec.path.raw().to_string(),
                source,
            })?
        };

        promoted.push((spec, stored));
    }

    Ok(promoted)
}
