use crate::value::{CoerceError, StorageType, StorageValue, Value, coerce};
use std::str::FromStr;

// ---- helpers -----------------------------------------------------------

fn v_txt(s: &str) -> Value {
    Value::Text(s.to_string())
}

// ---- text --------------------------------------------------------------

#[test]
fn text_passes_strings_through() {
    assert_eq!(
        coerce(&v_txt("hello"), StorageType::Text),
        Ok(StorageValue::Text("hello".to_string()))
    );
}

#[test]
fn text_stringifies_every_variant() {
    let cases = [
        (Value::Int(42), "42"),
        (Value::Float(1.5), "1.5"),
        (Value::Bool(true), "true"),
        (Value::Null, "null"),
        (Value::List(vec![Value::Int(1), Value::Int(2)]), "[1,2]"),
    ];

    for (value, expected) in cases {
        assert_eq!(
            coerce(&value, StorageType::Text),
            Ok(StorageValue::Text(expected.to_string()))
        );
    }
}

// ---- integer -----------------------------------------------------------

#[test]
fn integer_accepts_ints_and_bools() {
    assert_eq!(
        coerce(&Value::Int(-3), StorageType::Integer),
        Ok(StorageValue::Integer(-3))
    );
    assert_eq!(
        coerce(&Value::Bool(true), StorageType::Integer),
        Ok(StorageValue::Integer(1))
    );
    assert_eq!(
        coerce(&Value::Bool(false), StorageType::Integer),
        Ok(StorageValue::Integer(0))
    );
}

#[test]
fn integer_accepts_integer_valued_floats() {
    assert_eq!(
        coerce(&Value::Float(7.0), StorageType::Integer),
        Ok(StorageValue::Integer(7))
    );
}

#[test]
fn integer_rejects_fractional_floats_and_text() {
    assert!(matches!(
        coerce(&Value::Float(7.5), StorageType::Integer),
        Err(CoerceError::TypeMismatch { .. })
    ));
    assert!(matches!(
        coerce(&v_txt("7"), StorageType::Integer),
        Err(CoerceError::TypeMismatch { .. })
    ));
}

// ---- real / blob / boolean ---------------------------------------------

#[test]
fn real_accepts_numeric_only() {
    assert_eq!(
        coerce(&Value::Int(2), StorageType::Real),
        Ok(StorageValue::Real(2.0))
    );
    assert_eq!(
        coerce(&Value::Float(2.5), StorageType::Real),
        Ok(StorageValue::Real(2.5))
    );
    assert!(coerce(&Value::Bool(true), StorageType::Real).is_err());
    assert!(coerce(&v_txt("2.5"), StorageType::Real).is_err());
}

#[test]
fn blob_accepts_byte_sequences_only() {
    assert_eq!(
        coerce(&Value::Blob(vec![1, 2]), StorageType::Blob),
        Ok(StorageValue::Blob(vec![1, 2]))
    );
    assert!(coerce(&v_txt("bytes"), StorageType::Blob).is_err());
}

#[test]
fn boolean_maps_to_integer_zero_one() {
    assert_eq!(
        coerce(&Value::Bool(true), StorageType::Boolean),
        Ok(StorageValue::Integer(1))
    );
    assert_eq!(
        coerce(&Value::Bool(false), StorageType::Boolean),
        Ok(StorageValue::Integer(0))
    );
    assert!(coerce(&Value::Int(1), StorageType::Boolean).is_err());
}

// ---- storage type parsing ----------------------------------------------

#[test]
fn storage_type_parses_case_insensitively() {
    assert_eq!(StorageType::from_str("text"), Ok(StorageType::Text));
    assert_eq!(StorageType::from_str("INTEGER"), Ok(StorageType::Integer));
    assert_eq!(StorageType::from_str("Boolean"), Ok(StorageType::Boolean));
}

#[test]
fn storage_type_rejects_unknown_names() {
    let err = StorageType::from_str("varchar").unwrap_err();

    assert_eq!(err.name, "varchar");
}

// ---- natural mapping ----------------------------------------------------

#[test]
fn natural_mapping_follows_runtime_type() {
    assert_eq!(
        StorageValue::from_natural(&Value::Bool(true)),
        StorageValue::Integer(1)
    );
    assert_eq!(
        StorageValue::from_natural(&Value::Null),
        StorageValue::Null
    );
    assert_eq!(
        StorageValue::from_natural(&Value::List(vec![Value::Int(1)])),
        StorageValue::Text("[1]".to_string())
    );
}

// ---- json interop -------------------------------------------------------

#[test]
fn json_round_trips_documents() {
    let json: serde_json::Value = serde_json::from_str(
        r#"{ "name": "ada", "age": 36, "tags": ["x"], "meta": { "active": true } }"#,
    )
    .unwrap();

    let value = Value::from(json.clone());

    let Value::Map(fields) = &value else {
        panic!("expected a map");
    };
    assert_eq!(fields.get("name"), Some(&v_txt("ada")));
    assert_eq!(fields.get("age"), Some(&Value::Int(36)));

    assert_eq!(serde_json::Value::from(value), json);
}
