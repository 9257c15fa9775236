use crate::value::StorageValue;

///
/// Statement results
///
/// Transient outputs consumed immediately by the execution layer. Each one
/// upholds the same invariant: the number of `?` placeholders in `sql`
/// equals the parameter count, in left-to-right order, and no value is ever
/// inlined into the text.
///

///
/// Statement
///
/// A read or delete statement: one SQL string, one parameter vector.
///

#[derive(Clone, Debug, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<StorageValue>,
}

///
/// WriteStatement
///
/// A single-row write (update-one, insert). `payload_param_index` is the
/// position in `params` reserved for the serialized payload blob; it holds
/// `StorageValue::Null` until the execution layer substitutes the serialized
/// document. The builder stays agnostic of the serialization format.
///

#[derive(Clone, Debug, PartialEq)]
pub struct WriteStatement {
    pub sql: String,
    pub params: Vec<StorageValue>,
    pub payload_param_index: usize,
}

///
/// BatchStatement
///
/// A multi-entity write: one shared SQL template, one parameter row per
/// entity. Every row has the same column order as the template's placeholder
/// sequence, and the payload slot sits at the same index in each row.
///

#[derive(Clone, Debug, PartialEq)]
pub struct BatchStatement {
    pub sql: String,
    pub rows: Vec<Vec<StorageValue>>,
    pub payload_param_index: usize,
}
