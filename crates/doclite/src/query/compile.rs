use crate::{
    query::predicate::{CompareOp, Comparison, Predicate},
    schema::CollectionSchema,
    value::{CoerceError, StorageType, StorageValue, Value, coerce},
};
use thiserror::Error as ThisError;

///
/// Predicate compilation
///
/// Turns a predicate tree into a WHERE fragment plus its ordered parameter
/// vector. Operand values never appear in the fragment; each contributes a
/// `?` placeholder at the position its parameter occupies.
///
/// With a schema, field paths resolve to their physical columns and operands
/// coerce to the declared storage types. Without one (ad-hoc predicates),
/// names are used verbatim and operands pass through by their runtime type.
///

///
/// CompiledWhere
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CompiledWhere {
    pub fragment: String,
    pub params: Vec<StorageValue>,
}

///
/// CompileError
///

#[derive(Clone, Debug, PartialEq, ThisError)]
pub enum CompileError {
    #[error("IN/NOT IN operand for field '{field}' must be a non-empty list")]
    InvalidOperand { field: String },

    #[error("field '{field}' is not declared in the collection schema")]
    UnknownField { field: String },

    #[error("field '{field}': {source}")]
    TypeMismatch { field: String, source: CoerceError },
}

/// Compile an optional predicate tree against an optional schema.
///
/// An absent tree compiles to the empty fragment with no parameters; callers
/// omit the WHERE keyword entirely in that case.
pub fn compile_predicate(
    predicate: Option<&Predicate>,
    schema: Option<&CollectionSchema>,
) -> Result<CompiledWhere, CompileError> {
    let mut compiled = CompiledWhere::default();

    if let Some(predicate) = predicate {
        compile_node(predicate, schema, &mut compiled)?;
        tracing::trace!(
            fragment = %compiled.fragment,
            params = compiled.params.len(),
            "compiled predicate"
        );
    }

    Ok(compiled)
}

fn compile_node(
    predicate: &Predicate,
    schema: Option<&CollectionSchema>,
    out: &mut CompiledWhere,
) -> Result<(), CompileError> {
    match predicate {
        Predicate::Compare(comparison) => compile_leaf(comparison, schema, out),
        Predicate::Group(group) => {
            // One paren pair around the whole group; children that are
            // themselves groups wrap recursively.
            out.fragment.push('(');
            compile_node(&group.first, schema, out)?;
            for (combinator, child) in &group.rest {
                out.fragment.push(' ');
                out.fragment.push_str(&combinator.to_string());
                out.fragment.push(' ');
                compile_node(child, schema, out)?;
            }
            out.fragment.push(')');

            Ok(())
        }
    }
}

fn compile_leaf(
    comparison: &Comparison,
    schema: Option<&CollectionSchema>,
    out: &mut CompiledWhere,
) -> Result<(), CompileError> {
    let (column, storage) = resolve_column(&comparison.field, schema)?;

    if comparison.op.is_list_op() {
        let Value::List(items) = &comparison.value else {
            return Err(CompileError::InvalidOperand {
                field: comparison.field.clone(),
            });
        };
        if items.is_empty() {
            // Rendering `IN ()` would be silently false on some engines and
            // a syntax error on others.
            return Err(CompileError::InvalidOperand {
                field: comparison.field.clone(),
            });
        }

        out.fragment.push_str(column);
        out.fragment.push(' ');
        out.fragment.push_str(comparison.op.symbol());
        out.fragment.push_str(" (");
        for (index, item) in items.iter().enumerate() {
            if index > 0 {
                out.fragment.push_str(", ");
            }
            out.fragment.push('?');
            out.params
                .push(coerce_operand(item, storage, &comparison.field)?);
        }
        out.fragment.push(')');

        return Ok(());
    }

    if matches!(comparison.op, CompareOp::Is | CompareOp::IsNot) && comparison.value.is_null() {
        out.fragment.push_str(column);
        out.fragment.push(' ');
        out.fragment.push_str(comparison.op.symbol());
        out.fragment.push_str(" NULL");

        return Ok(());
    }

    out.fragment.push_str(column);
    out.fragment.push(' ');
    out.fragment.push_str(comparison.op.symbol());
    out.fragment.push_str(" ?");
    out.params
        .push(coerce_operand(&comparison.value, storage, &comparison.field)?);

    Ok(())
}

/// Resolve a field path to its physical column and declared storage type.
///
/// Undeclared top-level names pass through verbatim: they may address
/// physical columns outside the promoted schema (`_id`, `createdAt`).
/// Undeclared dotted paths have no physical column and are rejected.
pub(crate) fn resolve_column<'a>(
    field: &'a str,
    schema: Option<&'a CollectionSchema>,
) -> Result<(&'a str, Option<StorageType>), CompileError> {
    let Some(schema) = schema else {
        return Ok((field, None));
    };

    if let Some(spec) = schema.column(field) {
        return Ok((spec.path.column(), Some(spec.storage)));
    }

    if field.contains('.') {
        return Err(CompileError::UnknownField {
            field: field.to_string(),
        });
    }

    Ok((field, None))
}

fn coerce_operand(
    value: &Value,
    storage: Option<StorageType>,
    field: &str,
) -> Result<StorageValue, CompileError> {
    if value.is_null() {
        return Ok(StorageValue::Null);
    }

    match storage {
        Some(storage) => coerce(value, storage).map_err(|source| CompileError::TypeMismatch {
            field: field.to_string(),
            source,
        }),
        None => Ok(StorageValue::from_natural(value)),
    }
}
