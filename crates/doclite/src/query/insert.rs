use crate::{
    query::{BuildError, statement::WriteStatement},
    schema::{CollectionSchema, Document, resolve_path},
    value::{StorageValue, coerce},
};

///
/// InsertQuery
///
/// Single-row insert. Every row carries the full column set — identity,
/// every promoted column (absent document fields insert as NULL), the
/// opaque payload, and the timestamp columns when the collection timestamps
/// rows — so read paths always see a uniform layout.
///

#[derive(Clone, Debug)]
pub struct InsertQuery<'a> {
    schema: &'a CollectionSchema,
    document: Document,
}

impl<'a> InsertQuery<'a> {
    #[must_use]
    pub const fn new(schema: &'a CollectionSchema, document: Document) -> Self {
        Self { schema, document }
    }

    pub fn build(self) -> Result<WriteStatement, BuildError> {
        let identity = match self.document.get(self.schema.identity_column()) {
            Some(value) if !value.is_null() => value,
            _ => return Err(BuildError::MissingIdentity { position: 0 }),
        };

        let mut columns = vec![self.schema.identity_column().to_string()];
        let mut params = vec![StorageValue::from_natural(identity)];

        for spec in self.schema.columns() {
            let stored = match resolve_path(&self.document, &spec.path) {
                None => StorageValue::Null,
                Some(value) if value.is_null() => StorageValue::Null,
                Some(value) => {
                    coerce(value, spec.storage).map_err(|source| BuildError::TypeMismatch {
                        field: spec.path.raw().to_string(),
                        source,
                    })?
                }
            };

            columns.push(spec.path.column().to_string());
            params.push(stored);
        }

        columns.push(self.schema.payload_column().to_string());
        let payload_param_index = params.len();
        params.push(StorageValue::Null);

        let mut sql = String::from("INSERT INTO ");
        sql.push_str(self.schema.table());
        sql.push_str(" (");
        sql.push_str(&columns.join(", "));

        if self.schema.timestamps() {
            sql.push_str(", ");
            sql.push_str(self.schema.created_column());
            sql.push_str(", ");
            sql.push_str(self.schema.updated_column());
        }

        sql.push_str(") VALUES (");
        let placeholders = vec!["?"; params.len()].join(", ");
        sql.push_str(&placeholders);
        if self.schema.timestamps() {
            sql.push_str(", CURRENT_TIMESTAMP, CURRENT_TIMESTAMP");
        }
        sql.push(')');

        tracing::debug!(sql = %sql, params = params.len(), "built insert statement");

        Ok(WriteStatement {
            sql,
            params,
            payload_param_index,
        })
    }
}
