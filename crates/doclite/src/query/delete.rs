use crate::{
    query::{BuildError, compile::compile_predicate, predicate::Predicate, statement::Statement},
    schema::CollectionSchema,
};

///
/// DeleteQuery
///
/// Builder for delete statements. `build_one` caps the affected rows at
/// exactly one regardless of how many rows the predicate matches; "first
/// match" is whatever order the engine naturally returns, since no ORDER BY
/// is emitted. `build_many` deletes every matching row.
///

#[derive(Clone, Debug)]
pub struct DeleteQuery<'a> {
    table: String,
    schema: Option<&'a CollectionSchema>,
    filter: Option<Predicate>,
}

impl<'a> DeleteQuery<'a> {
    /// Delete from a table directly, without a collection schema.
    #[must_use]
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            schema: None,
            filter: None,
        }
    }

    /// Delete from a collection; field paths resolve through its schema.
    #[must_use]
    pub fn for_collection(schema: &'a CollectionSchema) -> Self {
        Self {
            schema: Some(schema),
            ..Self::new(schema.table())
        }
    }

    #[must_use]
    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.filter = Some(predicate);
        self
    }

    /// Build a statement deleting at most one matching row.
    pub fn build_one(self) -> Result<Statement, BuildError> {
        let mut statement = self.build_bare()?;
        statement.sql.push_str(" LIMIT 1");

        Ok(statement)
    }

    /// Build a statement deleting every matching row.
    pub fn build_many(self) -> Result<Statement, BuildError> {
        self.build_bare()
    }

    fn build_bare(self) -> Result<Statement, BuildError> {
        let mut sql = String::from("DELETE FROM ");
        sql.push_str(&self.table);

        let compiled = compile_predicate(self.filter.as_ref(), self.schema)?;
        if !compiled.fragment.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&compiled.fragment);
        }

        tracing::debug!(sql = %sql, params = compiled.params.len(), "built delete statement");

        Ok(Statement {
            sql,
            params: compiled.params,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::DeleteQuery;
    use crate::{query::predicate::Predicate, value::StorageValue};

    #[test]
    fn delete_one_without_filter_matches_the_contract_text() {
        let statement = DeleteQuery::new("users").build_one().unwrap();

        assert_eq!(statement.sql, "DELETE FROM users LIMIT 1");
        assert_eq!(statement.params, vec![]);
    }

    #[test]
    fn delete_many_with_in_list_matches_the_contract_text() {
        let statement = DeleteQuery::new("users")
            .filter(Predicate::in_("id", [1, 2, 3]))
            .build_many()
            .unwrap();

        assert_eq!(statement.sql, "DELETE FROM users WHERE id IN (?, ?, ?)");
        assert_eq!(
            statement.params,
            vec![
                StorageValue::Integer(1),
                StorageValue::Integer(2),
                StorageValue::Integer(3),
            ]
        );
    }

    #[test]
    fn delete_one_with_null_filter_matches_the_contract_text() {
        let statement = DeleteQuery::new("users")
            .filter(Predicate::is_null("email"))
            .build_one()
            .unwrap();

        assert_eq!(statement.sql, "DELETE FROM users WHERE email IS NULL LIMIT 1");
        assert_eq!(statement.params, vec![]);
    }

    #[test]
    fn delete_many_without_filter_deletes_everything() {
        let statement = DeleteQuery::new("users").build_many().unwrap();

        assert_eq!(statement.sql, "DELETE FROM users");
    }
}
