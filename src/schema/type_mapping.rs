//! Cell to GraphQL type mapping
//!
//! This module maps inferred scalar kinds to GraphQL type references and
//! projects raw cells into output values of the declared type.

use crate::data::{display_value, is_normal_integer, to_number};
use crate::schema::inference::ScalarKind;

use async_graphql::dynamic::TypeRef;
use async_graphql::Value;
use serde_json::Value as JsonValue;

/// Map an inferred kind to a nullable GraphQL type
///
/// Every generated field is nullable: spreadsheet cells may be blank in any
/// row, including the first.
pub fn scalar_type_ref(kind: ScalarKind) -> TypeRef {
    match kind {
        ScalarKind::Id => TypeRef::named(TypeRef::ID),
        ScalarKind::Boolean => TypeRef::named(TypeRef::BOOLEAN),
        ScalarKind::Int => TypeRef::named(TypeRef::INT),
        ScalarKind::String => TypeRef::named(TypeRef::STRING),
    }
}

/// Argument type for a lookup argument, judged from a sample cell
///
/// Canonical non-negative integers become `Int`, everything else `String`.
pub fn argument_kind(sample: Option<&JsonValue>) -> ScalarKind {
    match sample {
        Some(value) if is_normal_integer(value) => ScalarKind::Int,
        _ => ScalarKind::String,
    }
}

/// Convert a cell to a GraphQL output value of the given kind
///
/// # Conversion Rules
///
/// - `ID` → numbers and strings are rendered as strings
/// - `Int` → integral numbers and numeric strings within the 32-bit range
/// - `Boolean` → booleans, and numbers as "non-zero"
/// - `String` → strings as-is, numbers and booleans rendered as text
///
/// Cells that cannot be represented in the declared kind become null.
pub fn to_graphql_value(value: Option<&JsonValue>, kind: ScalarKind) -> Value {
    let Some(value) = value else {
        return Value::Null;
    };
    if value.is_null() {
        return Value::Null;
    }

    match kind {
        ScalarKind::Id | ScalarKind::String => Value::String(display_value(value)),
        ScalarKind::Int => {
            let number = match value {
                JsonValue::String(s) if s.trim().is_empty() => None,
                JsonValue::Array(_) | JsonValue::Object(_) => None,
                other => to_number(other),
            };
            match number {
                Some(n) if n.fract() == 0.0 && n >= i32::MIN as f64 && n <= i32::MAX as f64 => {
                    Value::Number((n as i32).into())
                }
                _ => {
                    tracing::debug!("Cannot represent {} as Int, returning null", value);
                    Value::Null
                }
            }
        }
        ScalarKind::Boolean => match value {
            JsonValue::Bool(b) => Value::Boolean(*b),
            JsonValue::Number(n) => Value::Boolean(n.as_f64().map(|f| f != 0.0).unwrap_or(true)),
            _ => {
                tracing::debug!("Cannot represent {} as Boolean, returning null", value);
                Value::Null
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalar_type_refs() {
        assert_eq!(scalar_type_ref(ScalarKind::Id).to_string(), "ID");
        assert_eq!(scalar_type_ref(ScalarKind::Int).to_string(), "Int");
        assert_eq!(scalar_type_ref(ScalarKind::Boolean).to_string(), "Boolean");
        assert_eq!(scalar_type_ref(ScalarKind::String).to_string(), "String");
    }

    #[test]
    fn test_argument_kind() {
        assert_eq!(argument_kind(Some(&json!("12"))), ScalarKind::Int);
        assert_eq!(argument_kind(Some(&json!(12))), ScalarKind::Int);
        assert_eq!(argument_kind(Some(&json!("12a"))), ScalarKind::String);
        assert_eq!(argument_kind(Some(&json!(true))), ScalarKind::String);
        assert_eq!(argument_kind(None), ScalarKind::String);
    }

    #[test]
    fn test_int_projection() {
        assert_eq!(to_graphql_value(Some(&json!("42")), ScalarKind::Int), Value::Number(42.into()));
        assert_eq!(to_graphql_value(Some(&json!(7)), ScalarKind::Int), Value::Number(7.into()));
        assert_eq!(to_graphql_value(Some(&json!("")), ScalarKind::Int), Value::Null);
        assert_eq!(to_graphql_value(Some(&json!("abc")), ScalarKind::Int), Value::Null);
        assert_eq!(to_graphql_value(None, ScalarKind::Int), Value::Null);
    }

    #[test]
    fn test_id_and_string_projection() {
        assert_eq!(
            to_graphql_value(Some(&json!(5)), ScalarKind::Id),
            Value::String("5".to_string())
        );
        assert_eq!(
            to_graphql_value(Some(&json!(true)), ScalarKind::String),
            Value::String("true".to_string())
        );
        assert_eq!(to_graphql_value(Some(&json!(null)), ScalarKind::String), Value::Null);
    }

    #[test]
    fn test_boolean_projection() {
        assert_eq!(to_graphql_value(Some(&json!(false)), ScalarKind::Boolean), Value::Boolean(false));
        assert_eq!(to_graphql_value(Some(&json!(1)), ScalarKind::Boolean), Value::Boolean(true));
        assert_eq!(to_graphql_value(Some(&json!("yes")), ScalarKind::Boolean), Value::Null);
    }
}
