use crate::{
    query::{
        BuildError,
        compile::compile_predicate,
        predicate::Predicate,
        statement::{BatchStatement, WriteStatement},
    },
    schema::{CollectionSchema, Document, extract},
    value::StorageValue,
};

///
/// Update builders
///
/// Both builders assemble their SET clause the same way: promoted top-level
/// columns first (schema iteration order), nested-path columns after, the
/// opaque payload column always, and the updated-timestamp column when the
/// collection timestamps rows. The payload placeholder position is reported
/// back so the execution layer can substitute the serialized document
/// without the builder knowing the serialization format.
///
/// Reserved columns are never promoted, so the identity and creation
/// timestamp columns cannot appear in a SET clause.
///

///
/// UpdateQuery
///
/// Single-target update: `UPDATE <table> SET <cols>[, updatedAt =
/// CURRENT_TIMESTAMP][ WHERE <w>][ RETURNING *]`. WHERE parameters follow
/// all SET parameters.
///

#[derive(Clone, Debug)]
pub struct UpdateQuery<'a> {
    schema: &'a CollectionSchema,
    document: Document,
    filter: Option<Predicate>,
}

impl<'a> UpdateQuery<'a> {
    #[must_use]
    pub const fn new(schema: &'a CollectionSchema, document: Document) -> Self {
        Self {
            schema,
            document,
            filter: None,
        }
    }

    #[must_use]
    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.filter = Some(predicate);
        self
    }

    pub fn build(self) -> Result<WriteStatement, BuildError> {
        let set = set_columns(&self.document, self.schema)?;

        let mut sql = String::from("UPDATE ");
        sql.push_str(self.schema.table());
        sql.push_str(" SET ");

        let mut params = Vec::with_capacity(set.len() + 1);
        for (column, value) in set {
            sql.push_str(column);
            sql.push_str(" = ?, ");
            params.push(value);
        }

        sql.push_str(self.schema.payload_column());
        sql.push_str(" = ?");
        let payload_param_index = params.len();
        params.push(StorageValue::Null);

        if self.schema.timestamps() {
            sql.push_str(", ");
            sql.push_str(self.schema.updated_column());
            sql.push_str(" = CURRENT_TIMESTAMP");
        }

        let compiled = compile_predicate(self.filter.as_ref(), Some(self.schema))?;
        if !compiled.fragment.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&compiled.fragment);
            params.extend(compiled.params);
        }

        if self.schema.timestamps() {
            sql.push_str(" RETURNING *");
        }

        tracing::debug!(sql = %sql, params = params.len(), "built update statement");

        Ok(WriteStatement {
            sql,
            params,
            payload_param_index,
        })
    }
}

///
/// UpdateBatchQuery
///
/// Multi-entity update: one shared template terminating in
/// `WHERE <identity> = ?`, one parameter row per target entity. SET values
/// are re-derived independently for every entity; a target lacking an
/// identity value aborts the whole batch before any row is emitted.
///

#[derive(Clone, Debug)]
pub struct UpdateBatchQuery<'a> {
    schema: &'a CollectionSchema,
    document: Document,
    targets: Vec<Document>,
}

impl<'a> UpdateBatchQuery<'a> {
    #[must_use]
    pub const fn new(schema: &'a CollectionSchema, document: Document) -> Self {
        Self {
            schema,
            document,
            targets: Vec::new(),
        }
    }

    #[must_use]
    pub fn target(mut self, entity: Document) -> Self {
        self.targets.push(entity);
        self
    }

    #[must_use]
    pub fn targets(mut self, entities: impl IntoIterator<Item = Document>) -> Self {
        self.targets.extend(entities);
        self
    }

    pub fn build(self) -> Result<BatchStatement, BuildError> {
        let template = set_columns(&self.document, self.schema)?;

        let mut sql = String::from("UPDATE ");
        sql.push_str(self.schema.table());
        sql.push_str(" SET ");
        for (column, _) in &template {
            sql.push_str(column);
            sql.push_str(" = ?, ");
        }
        sql.push_str(self.schema.payload_column());
        sql.push_str(" = ?");
        let payload_param_index = template.len();

        if self.schema.timestamps() {
            sql.push_str(", ");
            sql.push_str(self.schema.updated_column());
            sql.push_str(" = CURRENT_TIMESTAMP");
        }

        sql.push_str(" WHERE ");
        sql.push_str(self.schema.identity_column());
        sql.push_str(" = ?");

        if self.schema.timestamps() {
            sql.push_str(" RETURNING *");
        }

        let mut rows = Vec::with_capacity(self.targets.len());
        for (position, entity) in self.targets.iter().enumerate() {
            let identity = match entity.get(self.schema.identity_column()) {
                Some(value) if !value.is_null() => value,
                _ => return Err(BuildError::MissingIdentity { position }),
            };

            let values = set_columns(&self.document, self.schema)?;
            let mut row = Vec::with_capacity(values.len() + 2);
            row.extend(values.into_iter().map(|(_, value)| value));
            row.push(StorageValue::Null);
            row.push(StorageValue::from_natural(identity));

            rows.push(row);
        }

        tracing::debug!(sql = %sql, rows = rows.len(), "built batch update statement");

        Ok(BatchStatement {
            sql,
            rows,
            payload_param_index,
        })
    }
}

/// Derive the ordered SET columns for an update document: top-level promoted
/// fields first, nested paths after, schema order within each.
fn set_columns<'s>(
    document: &Document,
    schema: &'s CollectionSchema,
) -> Result<Vec<(&'s str, StorageValue)>, BuildError> {
    let (top, nested): (Vec<_>, Vec<_>) = extract(document, schema)?
        .into_iter()
        .partition(|(spec, _)| !spec.path.is_nested());

    Ok(top
        .into_iter()
        .chain(nested)
        .map(|(spec, value)| (spec.path.column(), value))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::{UpdateBatchQuery, UpdateQuery};
    use crate::{
        query::{BuildError, predicate::Predicate},
        schema::{CollectionSchema, Document},
        value::{StorageType, StorageValue, Value},
    };
    use std::collections::BTreeMap;

    fn users_schema() -> CollectionSchema {
        CollectionSchema::builder("users")
            .column("name", StorageType::Text)
            .column("age", StorageType::Integer)
            .column("profile.city", StorageType::Text)
            .build()
            .unwrap()
    }

    fn untimestamped_schema() -> CollectionSchema {
        CollectionSchema::builder("users")
            .column("name", StorageType::Text)
            .timestamps(false)
            .build()
            .unwrap()
    }

    fn doc(entries: &[(&str, Value)]) -> Document {
        entries
            .iter()
            .map(|(key, value)| ((*key).to_string(), value.clone()))
            .collect()
    }

    fn nested(entries: &[(&str, Value)]) -> Value {
        Value::Map(
            entries
                .iter()
                .map(|(key, value)| ((*key).to_string(), value.clone()))
                .collect::<BTreeMap<_, _>>(),
        )
    }

    #[test]
    fn set_orders_top_level_then_nested_then_payload() {
        let schema = users_schema();
        let document = doc(&[
            ("profile", nested(&[("city", Value::from("london"))])),
            ("name", Value::from("ada")),
            ("age", Value::Int(36)),
        ]);

        let statement = UpdateQuery::new(&schema, document)
            .filter(Predicate::eq("_id", "u1"))
            .build()
            .unwrap();

        assert_eq!(
            statement.sql,
            "UPDATE users SET age = ?, name = ?, profile_city = ?, _data = ?, \
             updatedAt = CURRENT_TIMESTAMP WHERE _id = ? RETURNING *"
        );
        assert_eq!(
            statement.params,
            vec![
                StorageValue::Integer(36),
                StorageValue::Text("ada".to_string()),
                StorageValue::Text("london".to_string()),
                StorageValue::Null,
                StorageValue::Text("u1".to_string()),
            ]
        );
        assert_eq!(statement.payload_param_index, 3);
    }

    #[test]
    fn omitted_fields_stay_out_of_set() {
        let schema = users_schema();
        let document = doc(&[("name", Value::from("ada"))]);

        let statement = UpdateQuery::new(&schema, document).build().unwrap();

        assert!(!statement.sql.contains("age"));
        assert!(!statement.sql.contains("profile_city"));
    }

    #[test]
    fn present_null_fields_are_set() {
        let schema = users_schema();
        let document = doc(&[("age", Value::Null)]);

        let statement = UpdateQuery::new(&schema, document).build().unwrap();

        assert!(statement.sql.starts_with("UPDATE users SET age = ?, _data = ?"));
        assert_eq!(statement.params[0], StorageValue::Null);
    }

    #[test]
    fn empty_document_still_replaces_the_payload() {
        let schema = untimestamped_schema();

        let statement = UpdateQuery::new(&schema, Document::new()).build().unwrap();

        assert_eq!(statement.sql, "UPDATE users SET _data = ?");
        assert_eq!(statement.params, vec![StorageValue::Null]);
        assert_eq!(statement.payload_param_index, 0);
    }

    #[test]
    fn timestamps_off_drops_updated_column_and_returning() {
        let schema = untimestamped_schema();
        let document = doc(&[("name", Value::from("ada"))]);

        let statement = UpdateQuery::new(&schema, document).build().unwrap();

        assert_eq!(statement.sql, "UPDATE users SET name = ?, _data = ?");
    }

    #[test]
    fn where_params_follow_set_params() {
        let schema = users_schema();
        let document = doc(&[("age", Value::Int(1))]);

        let statement = UpdateQuery::new(&schema, document)
            .filter(Predicate::gt("age", 40))
            .build()
            .unwrap();

        assert_eq!(
            statement.params,
            vec![
                StorageValue::Integer(1),
                StorageValue::Null,
                StorageValue::Integer(40),
            ]
        );
    }

    #[test]
    fn batch_builds_one_shared_template() {
        let schema = users_schema();
        let document = doc(&[("age", Value::Int(50))]);

        let batch = UpdateBatchQuery::new(&schema, document)
            .target(doc(&[("_id", Value::from("u1"))]))
            .target(doc(&[("_id", Value::from("u2"))]))
            .build()
            .unwrap();

        assert_eq!(
            batch.sql,
            "UPDATE users SET age = ?, _data = ?, updatedAt = CURRENT_TIMESTAMP \
             WHERE _id = ? RETURNING *"
        );
        assert_eq!(batch.payload_param_index, 1);
        assert_eq!(
            batch.rows,
            vec![
                vec![
                    StorageValue::Integer(50),
                    StorageValue::Null,
                    StorageValue::Text("u1".to_string()),
                ],
                vec![
                    StorageValue::Integer(50),
                    StorageValue::Null,
                    StorageValue::Text("u2".to_string()),
                ],
            ]
        );
    }

    #[test]
    fn batch_aborts_on_missing_identity() {
        let schema = users_schema();
        let document = doc(&[("age", Value::Int(50))]);

        let err = UpdateBatchQuery::new(&schema, document)
            .target(doc(&[("_id", Value::from("u1"))]))
            .target(doc(&[("name", Value::from("no-id"))]))
            .build()
            .unwrap_err();

        assert_eq!(err, BuildError::MissingIdentity { position: 1 });
    }

    #[test]
    fn batch_treats_null_identity_as_missing() {
        let schema = users_schema();

        let err = UpdateBatchQuery::new(&schema, Document::new())
            .target(doc(&[("_id", Value::Null)]))
            .build()
            .unwrap_err();

        assert_eq!(err, BuildError::MissingIdentity { position: 0 });
    }
}
