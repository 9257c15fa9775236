//! Statement builders and predicate compilation.
//!
//! Every builder here is a pure function from (schema, predicate/document,
//! options) to a statement result. No state is retained between calls and
//! no SQL is ever executed at this layer.

pub mod compile;
pub mod delete;
pub mod find;
pub mod insert;
pub mod predicate;
pub mod statement;
pub mod update;

#[cfg(test)]
mod tests;

pub use compile::{CompileError, CompiledWhere, compile_predicate};
pub use delete::DeleteQuery;
pub use find::{FindQuery, OrderDirection};
pub use insert::InsertQuery;
pub use predicate::{Combinator, CompareOp, Comparison, Group, Predicate};
pub use statement::{BatchStatement, Statement, WriteStatement};
pub use update::{UpdateBatchQuery, UpdateQuery};

use crate::{schema::ExtractError, value::CoerceError};
use thiserror::Error as ThisError;

///
/// BuildError
///
/// Failure while assembling a statement. All variants are detected
/// synchronously before any statement text is returned; a caller never holds
/// a partially-built statement.
///

#[derive(Clone, Debug, PartialEq, ThisError)]
pub enum BuildError {
    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error("field '{field}': {source}")]
    TypeMismatch { field: String, source: CoerceError },

    #[error("target entity at position {position} has no identity value")]
    MissingIdentity { position: usize },
}
