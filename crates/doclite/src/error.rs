use crate::{
    query::{BuildError, CompileError},
    schema::{ExtractError, SchemaError},
    value::CoerceError,
};
use thiserror::Error as ThisError;

///
/// Error
///
/// Crate-level error surface aggregating the module errors. Every variant is
/// a local, synchronous failure returned to the immediate caller; there is no
/// retry at this layer. Engine-side failures are a different, out-of-scope
/// error domain owned by the execution layer.
///

#[derive(Clone, Debug, PartialEq, ThisError)]
pub enum Error {
    #[error(transparent)]
    Coerce(#[from] CoerceError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    Build(#[from] BuildError),
}
