use crate::value::{StorageType, StorageValue, Value};
use thiserror::Error as ThisError;

///
/// Storage coercion
///
/// Converts a runtime [`Value`] into the [`StorageValue`] required by a
/// declared column type. Pure and total over the declared domain; anything
/// that cannot be represented losslessly fails with
/// [`CoerceError::TypeMismatch`].
///
/// `Null` is intentionally not handled here. Absence and null are decided
/// one layer up (predicate `IS NULL`, field omission on update); by the time
/// a value reaches coercion it is a present, non-null field value.
///

/// Largest integer magnitude a float can carry losslessly.
const F64_SAFE_INT: f64 = (1_i64 << 53) as f64;

///
/// CoerceError
///

#[derive(Clone, Debug, PartialEq, ThisError)]
pub enum CoerceError {
    #[error("cannot represent {value:?} as {storage}")]
    TypeMismatch { value: Value, storage: StorageType },
}

/// Coerce a value to the given declared storage type.
pub fn coerce(value: &Value, storage: StorageType) -> Result<StorageValue, CoerceError> {
    match storage {
        // Stringification never fails.
        StorageType::Text => Ok(StorageValue::Text(value.to_text())),
        StorageType::Integer => coerce_integer(value),
        StorageType::Real => match value {
            Value::Int(number) => Ok(StorageValue::Real(*number as f64)),
            Value::Float(number) => Ok(StorageValue::Real(*number)),
            other => Err(mismatch(other, storage)),
        },
        StorageType::Blob => match value {
            Value::Blob(bytes) => Ok(StorageValue::Blob(bytes.clone())),
            other => Err(mismatch(other, storage)),
        },
        StorageType::Boolean => match value {
            Value::Bool(flag) => Ok(StorageValue::Integer(i64::from(*flag))),
            other => Err(mismatch(other, storage)),
        },
    }
}

fn coerce_integer(value: &Value) -> Result<StorageValue, CoerceError> {
    match value {
        Value::Int(number) => Ok(StorageValue::Integer(*number)),
        Value::Bool(flag) => Ok(StorageValue::Integer(i64::from(*flag))),
        // Integer-valued floats are accepted inside the lossless f64 range.
        Value::Float(number) if number.fract() == 0.0 && number.abs() <= F64_SAFE_INT => {
            Ok(StorageValue::Integer(*number as i64))
        }
        other => Err(mismatch(other, StorageType::Integer)),
    }
}

fn mismatch(value: &Value, storage: StorageType) -> CoerceError {
    CoerceError::TypeMismatch {
        value: value.clone(),
        storage,
    }
}
