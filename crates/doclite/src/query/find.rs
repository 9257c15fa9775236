use crate::{
    query::{
        BuildError,
        compile::{compile_predicate, resolve_column},
        predicate::Predicate,
        statement::Statement,
    },
    schema::CollectionSchema,
    value::StorageValue,
};
use derive_more::Display;
use serde::{Deserialize, Serialize};

///
/// OrderDirection
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Display, Eq, PartialEq, Serialize)]
pub enum OrderDirection {
    #[default]
    #[display("ASC")]
    Asc,

    #[display("DESC")]
    Desc,
}

///
/// FindQuery
///
/// Builder for read statements. Clauses are emitted in fixed order —
/// `SELECT [DISTINCT ]* FROM <table>[ WHERE][ GROUP BY][ ORDER BY]
/// [ LIMIT ?[ OFFSET ?]]` — and an unset option omits its clause entirely.
/// LIMIT and OFFSET are parameterized; their parameters follow the WHERE
/// parameters.
///

#[derive(Clone, Debug)]
pub struct FindQuery<'a> {
    table: String,
    schema: Option<&'a CollectionSchema>,
    distinct: bool,
    filter: Option<Predicate>,
    group_by: Vec<String>,
    order_by: Vec<(String, OrderDirection)>,
    limit: Option<u64>,
    offset: Option<u64>,
}

impl<'a> FindQuery<'a> {
    /// Query a table directly, without a collection schema (ad-hoc mode).
    #[must_use]
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            schema: None,
            distinct: false,
            filter: None,
            group_by: Vec::new(),
            order_by: Vec::new(),
            limit: None,
            offset: None,
        }
    }

    /// Query a collection; field paths resolve through its schema.
    #[must_use]
    pub fn for_collection(schema: &'a CollectionSchema) -> Self {
        Self {
            schema: Some(schema),
            ..Self::new(schema.table())
        }
    }

    #[must_use]
    pub const fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    #[must_use]
    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.filter = Some(predicate);
        self
    }

    /// Append a grouping field. Field paths resolve like WHERE columns.
    #[must_use]
    pub fn group_by(mut self, field: impl Into<String>) -> Self {
        self.group_by.push(field.into());
        self
    }

    /// Append an ordering field; per-field order is preserved as given.
    #[must_use]
    pub fn order_by(mut self, field: impl Into<String>, direction: OrderDirection) -> Self {
        self.order_by.push((field.into(), direction));
        self
    }

    #[must_use]
    pub const fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Row offset. Only emitted together with a limit; the engine's grammar
    /// has no standalone OFFSET.
    #[must_use]
    pub const fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn build(self) -> Result<Statement, BuildError> {
        let mut sql = String::from("SELECT ");
        if self.distinct {
            sql.push_str("DISTINCT ");
        }
        sql.push_str("* FROM ");
        sql.push_str(&self.table);

        let compiled = compile_predicate(self.filter.as_ref(), self.schema)?;
        let mut params = compiled.params;
        if !compiled.fragment.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&compiled.fragment);
        }

        if !self.group_by.is_empty() {
            sql.push_str(" GROUP BY ");
            for (index, field) in self.group_by.iter().enumerate() {
                if index > 0 {
                    sql.push_str(", ");
                }
                let (column, _) = resolve_column(field, self.schema)?;
                sql.push_str(column);
            }
        }

        if !self.order_by.is_empty() {
            sql.push_str(" ORDER BY ");
            for (index, (field, direction)) in self.order_by.iter().enumerate() {
                if index > 0 {
                    sql.push_str(", ");
                }
                let (column, _) = resolve_column(field, self.schema)?;
                sql.push_str(column);
                sql.push(' ');
                sql.push_str(&direction.to_string());
            }
        }

        if let Some(limit) = self.limit {
            sql.push_str(" LIMIT ?");
            params.push(StorageValue::Integer(clamp_to_i64(limit)));

            if let Some(offset) = self.offset {
                sql.push_str(" OFFSET ?");
                params.push(StorageValue::Integer(clamp_to_i64(offset)));
            }
        }

        tracing::debug!(sql = %sql, params = params.len(), "built find statement");

        Ok(Statement { sql, params })
    }
}

const fn clamp_to_i64(value: u64) -> i64 {
    if value > i64::MAX as u64 {
        i64::MAX
    } else {
        value as i64
    }
}

#[cfg(test)]
mod tests {
    use super::{FindQuery, OrderDirection};
    use crate::{
        query::predicate::Predicate,
        schema::CollectionSchema,
        value::{StorageType, StorageValue},
    };

    #[test]
    fn bare_find_selects_everything() {
        let statement = FindQuery::new("t").build().unwrap();

        assert_eq!(statement.sql, "SELECT * FROM t");
        assert_eq!(statement.params, vec![]);
    }

    #[test]
    fn filtered_find_matches_the_contract_text() {
        let filter = Predicate::gt("age", 21).and(Predicate::eq("active", true));

        let statement = FindQuery::new("t").filter(filter).build().unwrap();

        assert_eq!(statement.sql, "SELECT * FROM t WHERE (age > ? AND active = ?)");
        assert_eq!(
            statement.params,
            vec![StorageValue::Integer(21), StorageValue::Integer(1)]
        );
    }

    #[test]
    fn all_clauses_emit_in_fixed_order() {
        let statement = FindQuery::new("t")
            .distinct()
            .filter(Predicate::eq("a", 1))
            .group_by("g")
            .order_by("o", OrderDirection::Desc)
            .limit(10)
            .offset(20)
            .build()
            .unwrap();

        assert_eq!(
            statement.sql,
            "SELECT DISTINCT * FROM t WHERE a = ? GROUP BY g ORDER BY o DESC LIMIT ? OFFSET ?"
        );
        assert_eq!(
            statement.params,
            vec![
                StorageValue::Integer(1),
                StorageValue::Integer(10),
                StorageValue::Integer(20),
            ]
        );
    }

    #[test]
    fn limit_params_follow_where_params() {
        let statement = FindQuery::new("t")
            .filter(Predicate::eq("a", 7))
            .limit(1)
            .build()
            .unwrap();

        assert_eq!(
            statement.params,
            vec![StorageValue::Integer(7), StorageValue::Integer(1)]
        );
    }

    #[test]
    fn offset_without_limit_is_dropped() {
        let statement = FindQuery::new("t").offset(5).build().unwrap();

        assert_eq!(statement.sql, "SELECT * FROM t");
        assert_eq!(statement.params, vec![]);
    }

    #[test]
    fn multiple_order_fields_preserve_caller_order() {
        let statement = FindQuery::new("t")
            .order_by("b", OrderDirection::Asc)
            .order_by("a", OrderDirection::Desc)
            .build()
            .unwrap();

        assert_eq!(statement.sql, "SELECT * FROM t ORDER BY b ASC, a DESC");
    }

    #[test]
    fn schema_flattens_order_and_group_fields() {
        let schema = CollectionSchema::builder("users")
            .column("profile.city", StorageType::Text)
            .build()
            .unwrap();

        let statement = FindQuery::for_collection(&schema)
            .group_by("profile.city")
            .order_by("profile.city", OrderDirection::Asc)
            .build()
            .unwrap();

        assert_eq!(
            statement.sql,
            "SELECT * FROM users GROUP BY profile_city ORDER BY profile_city ASC"
        );
    }
}
