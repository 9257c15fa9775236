//! Core statement compiler for doclite: document values, collection schemas,
//! predicate compilation, and parameterized statement builders.
//!
//! Nothing in this crate executes SQL. Every builder is a pure function from
//! (schema, predicate/document, options) to a statement result; the relational
//! engine and the payload serializer are external collaborators reached
//! through [`query::Statement`], [`query::WriteStatement`], and
//! [`query::BatchStatement`].

pub mod config;
pub mod error;
pub mod query;
pub mod schema;
pub mod value;

pub use error::Error;

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No errors or internal helpers are re-exported here.
///

pub mod prelude {
    pub use crate::{
        query::{
            DeleteQuery, FindQuery, InsertQuery, OrderDirection, Predicate, UpdateBatchQuery,
            UpdateQuery,
        },
        schema::{CollectionSchema, Document},
        value::{StorageType, StorageValue, Value},
    };
}
