//! Scalar type inference from sampled cell values
//!
//! A column is classified as Boolean, Int or String by looking at every
//! truthy value it holds. Inference is pure: a Boolean verdict carries a
//! [`Coercion`] plan that the builder applies to its own copy of the rows.

use crate::data::{display_value, format_float, is_normal_integer, is_truthy, to_number, Row};

use serde_json::Value as JsonValue;

/// Description attached to columns whose values were all empty.
pub const UNKNOWN_TYPE_DESCRIPTION: &str =
    " \n\n Unknown type. Could not infer type from data because all values were empty";

/// How many sample values a String description lists.
const EXAMPLE_COUNT: usize = 3;

/// Scalar kind of an inferred column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    Id,
    Boolean,
    Int,
    String,
}

/// Rewrite to apply to every row of a column before it is served
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coercion {
    /// Numeric `0` and falsy values become `false`, everything else `true`.
    ToBoolean,
}

impl Coercion {
    pub fn apply(self, field: &str, rows: &mut [Row]) {
        match self {
            Coercion::ToBoolean => {
                for row in rows.iter_mut() {
                    let coerced = coerce_to_boolean(row.get(field));
                    row.insert(field.to_string(), JsonValue::Bool(coerced));
                }
            }
        }
    }
}

/// Only the numeral zero and falsy cells read as false; the string `"0"`
/// is a non-empty string and therefore true.
fn coerce_to_boolean(value: Option<&JsonValue>) -> bool {
    match value {
        Some(JsonValue::Number(n)) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        other => is_truthy(other),
    }
}

/// Result of inferring one column
#[derive(Debug, Clone, PartialEq)]
pub struct Inference {
    pub kind: ScalarKind,
    pub description: String,
    pub coercion: Option<Coercion>,
}

impl Inference {
    fn new(kind: ScalarKind, description: impl Into<String>) -> Self {
        Self {
            kind,
            description: description.into(),
            coercion: None,
        }
    }
}

/// Infer the scalar kind of `field` from all of `rows`.
///
/// Falsy cells (absent, null, `0`, `""`, `false`) are ignored, so a column
/// holding only zeros or only `false` reads as empty and falls back to
/// String. That is a known trade-off of treating spreadsheet blanks and
/// zeros alike.
pub fn infer_type(field: &str, rows: &[Row]) -> Inference {
    let values: Vec<&JsonValue> = rows
        .iter()
        .filter_map(|row| row.get(field))
        .filter(|value| is_truthy(Some(*value)))
        .collect();

    if values.is_empty() {
        return Inference::new(ScalarKind::String, UNKNOWN_TYPE_DESCRIPTION);
    }

    if values.iter().all(|value| is_boolean_like(value)) {
        return Inference {
            coercion: Some(Coercion::ToBoolean),
            ..Inference::new(ScalarKind::Boolean, "")
        };
    }

    if values.iter().all(|value| is_normal_integer(value)) {
        let numbers = values.iter().filter_map(|value| to_number(value));
        let (min, max) = numbers.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), n| {
            (lo.min(n), hi.max(n))
        });
        return Inference::new(
            ScalarKind::Int,
            format!(
                "\nMin value: {}\nMax value: {}",
                format_float(min),
                format_float(max)
            ),
        );
    }

    let examples: Vec<String> = values
        .iter()
        .take(EXAMPLE_COUNT)
        .map(|value| display_value(value))
        .collect();
    Inference::new(
        ScalarKind::String,
        format!("Examples:\n{}", examples.join("\n")),
    )
}

/// Loosely equal to 0 or 1 (which also covers `true` and `false`).
fn is_boolean_like(value: &JsonValue) -> bool {
    match value {
        JsonValue::Array(_) | JsonValue::Object(_) => false,
        _ => matches!(to_number(value), Some(n) if n == 0.0 || n == 1.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rows_with(field: &str, values: Vec<JsonValue>) -> Vec<Row> {
        values
            .into_iter()
            .map(|value| {
                let mut row = Row::new();
                row.insert(field.to_string(), value);
                row
            })
            .collect()
    }

    #[test]
    fn test_boolean_from_zero_one() {
        let mut rows = rows_with("active", vec![json!(1), json!(0), json!(1), json!(1)]);

        let inference = infer_type("active", &rows);
        assert_eq!(inference.kind, ScalarKind::Boolean);
        assert_eq!(inference.coercion, Some(Coercion::ToBoolean));

        inference.coercion.unwrap().apply("active", &mut rows);
        let coerced: Vec<&JsonValue> = rows.iter().map(|r| &r["active"]).collect();
        assert_eq!(coerced, vec![&json!(true), &json!(false), &json!(true), &json!(true)]);
    }

    #[test]
    fn test_boolean_from_strings_keeps_string_zero_true() {
        let mut rows = rows_with("flag", vec![json!("1"), json!("0"), json!("")]);

        let inference = infer_type("flag", &rows);
        assert_eq!(inference.kind, ScalarKind::Boolean);

        inference.coercion.unwrap().apply("flag", &mut rows);
        assert_eq!(rows[0]["flag"], json!(true));
        assert_eq!(rows[1]["flag"], json!(true));
        assert_eq!(rows[2]["flag"], json!(false));
    }

    #[test]
    fn test_boolean_coercion_fills_missing_cells() {
        let mut rows = rows_with("flag", vec![json!(true)]);
        rows.push(Row::new());

        let inference = infer_type("flag", &rows);
        inference.coercion.unwrap().apply("flag", &mut rows);
        assert_eq!(rows[1]["flag"], json!(false));
    }

    #[test]
    fn test_integer_reports_min_and_max() {
        let rows = rows_with("pages", vec![json!("3"), json!("10"), json!("7")]);

        let inference = infer_type("pages", &rows);
        assert_eq!(inference.kind, ScalarKind::Int);
        assert_eq!(inference.description, "\nMin value: 3\nMax value: 10");
        assert!(inference.coercion.is_none());
    }

    #[test]
    fn test_integer_ignores_zero_cells() {
        let rows = rows_with("count", vec![json!(0), json!(12), json!(5)]);

        let inference = infer_type("count", &rows);
        assert_eq!(inference.kind, ScalarKind::Int);
        assert_eq!(inference.description, "\nMin value: 5\nMax value: 12");
    }

    #[test]
    fn test_empty_values_are_unknown_strings() {
        let rows = rows_with("note", vec![json!(""), json!(null), json!(0), json!(false)]);

        let inference = infer_type("note", &rows);
        assert_eq!(inference.kind, ScalarKind::String);
        assert!(inference.description.contains("Unknown type"));

        let inference = infer_type("note", &[]);
        assert_eq!(inference.kind, ScalarKind::String);
        assert_eq!(inference.description, UNKNOWN_TYPE_DESCRIPTION);
    }

    #[test]
    fn test_string_lists_three_examples() {
        let rows = rows_with(
            "title",
            vec![json!("Dune"), json!(""), json!("Emma"), json!("Ubik"), json!("Kindred")],
        );

        let inference = infer_type("title", &rows);
        assert_eq!(inference.kind, ScalarKind::String);
        assert_eq!(inference.description, "Examples:\nDune\nEmma\nUbik");
    }

    #[test]
    fn test_negative_and_fractional_numbers_are_strings() {
        let rows = rows_with("delta", vec![json!("-4"), json!("2")]);
        assert_eq!(infer_type("delta", &rows).kind, ScalarKind::String);

        let rows = rows_with("ratio", vec![json!(2.5), json!(3)]);
        assert_eq!(infer_type("ratio", &rows).kind, ScalarKind::String);
    }
}
