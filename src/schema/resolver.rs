//! GraphQL resolvers for collection queries
//!
//! This module provides the resolver functions of a generated schema:
//! - Singular lookup by row index or by the first supplied column argument
//! - List with sort / offset / limit
//! - Column projection and relation lookup on a row
//!
//! The selection logic itself is kept in plain functions so it can be tested
//! without executing GraphQL requests.

use crate::data::{compare_sort_keys, loose_eq, Collection, Row, SharedDataset};
use crate::schema::inference::ScalarKind;
use crate::schema::type_mapping::{scalar_type_ref, to_graphql_value};

use async_graphql::dynamic::{Field, FieldFuture, FieldValue, InputValue, ResolverContext, TypeRef};
use async_graphql::Value;
use serde_json::Value as JsonValue;
use std::sync::Arc;

/// Name of the row-index argument of every singular field.
pub const ROW_ARGUMENT: &str = "row";

/// Select one row: by index when given, otherwise by the first filter.
///
/// An index outside the collection yields `None` rather than an error.
pub fn find_row<'a>(
    rows: &'a [Row],
    index: Option<i64>,
    filter: Option<(&str, &JsonValue)>,
) -> Option<&'a Row> {
    if let Some(index) = index {
        return usize::try_from(index).ok().and_then(|i| rows.get(i));
    }
    let (key, value) = filter?;
    rows.iter().find(|row| loose_eq(row.get(key), Some(value)))
}

/// Row whose `id` is strictly equal to `id`.
pub fn find_by_id<'a>(rows: &'a [Row], id: Option<&JsonValue>) -> Option<&'a Row> {
    let id = id?;
    rows.iter().find(|row| match (row.get("id"), id) {
        (Some(JsonValue::Number(a)), JsonValue::Number(b)) => a.as_f64() == b.as_f64(),
        (Some(candidate), _) => candidate == id,
        (None, _) => false,
    })
}

/// Arguments of a list field
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub sort: Option<String>,
    pub sort_desc: Option<String>,
}

impl ListQuery {
    fn from_context(ctx: &ResolverContext<'_>) -> Self {
        let int_arg = |name: &str| ctx.args.get(name).and_then(|v| v.i64().ok());
        let string_arg = |name: &str| {
            ctx.args
                .get(name)
                .and_then(|v| v.string().ok().map(str::to_string))
        };

        Self {
            limit: int_arg("limit"),
            offset: int_arg("offset"),
            sort: string_arg("sort"),
            sort_desc: string_arg("sortDesc"),
        }
    }

    /// Sort, then skip `offset`, then keep `limit`. The input is left untouched.
    ///
    /// `sortDesc` sorts ascending exactly like `sort`; when both are given
    /// the `sortDesc` pass runs last and decides the order. Empty sort keys
    /// and a zero offset or limit are ignored, and negative values count from
    /// the end of the list.
    pub fn apply<'a>(&self, rows: &'a [Row]) -> Vec<&'a Row> {
        let mut selected: Vec<&Row> = rows.iter().collect();

        for key in [&self.sort, &self.sort_desc].into_iter().flatten() {
            if key.is_empty() {
                continue;
            }
            selected.sort_by(|a, b| compare_sort_keys(a.get(key.as_str()), b.get(key.as_str())));
        }

        if let Some(offset) = self.offset.filter(|o| *o != 0) {
            let start = slice_bound(offset, selected.len());
            selected.drain(..start);
        }

        if let Some(limit) = self.limit.filter(|l| *l != 0) {
            let end = slice_bound(limit, selected.len());
            selected.truncate(end);
        }

        selected
    }
}

/// Clamp a possibly negative slice bound into `0..=len`.
fn slice_bound(bound: i64, len: usize) -> usize {
    if bound < 0 {
        let back = usize::try_from(bound.unsigned_abs()).unwrap_or(usize::MAX);
        len.saturating_sub(back)
    } else {
        usize::try_from(bound).unwrap_or(usize::MAX).min(len)
    }
}

/// A column argument of a singular field
#[derive(Debug, Clone, PartialEq)]
pub struct LookupArgument {
    /// Argument name exposed in the schema
    pub name: String,
    /// Row key compared against the argument value
    pub column: String,
    pub kind: ScalarKind,
}

fn row_value<'a>(row: &Row) -> FieldValue<'a> {
    FieldValue::owned_any(row.clone())
}

/// Create the singular lookup field of a collection
///
/// Arguments are `row` plus one per column in `lookup_args`, in order. When
/// several column arguments are supplied only the first declared one is used.
pub fn create_get_resolver(
    field_name: &str,
    type_name: &str,
    description: &str,
    rows: Arc<Collection>,
    lookup_args: Vec<LookupArgument>,
) -> Field {
    let keys: Vec<(String, String)> = lookup_args
        .iter()
        .map(|arg| (arg.name.clone(), arg.column.clone()))
        .collect();

    let mut field = Field::new(field_name, TypeRef::named(type_name), move |ctx: ResolverContext| {
        let rows = rows.clone();
        let keys = keys.clone();

        FieldFuture::new(async move {
            let index = ctx
                .args
                .get(ROW_ARGUMENT)
                .filter(|v| !v.is_null())
                .map(|v| v.i64())
                .transpose()?;

            let mut filter = None;
            if index.is_none() {
                for (name, column) in &keys {
                    if let Some(arg) = ctx.args.get(name.as_str()).filter(|v| !v.is_null()) {
                        let value = arg.as_value().clone().into_json()?;
                        filter = Some((column.clone(), value));
                        break;
                    }
                }
            }

            tracing::debug!(?index, ?filter, "Resolving single row");

            let found = find_row(
                &rows,
                index,
                filter.as_ref().map(|(key, value)| (key.as_str(), value)),
            );
            Ok(found.map(row_value))
        })
    })
    .argument(InputValue::new(ROW_ARGUMENT, TypeRef::named(TypeRef::INT)));

    if !description.is_empty() {
        field = field.description(description);
    }

    for arg in lookup_args {
        field = field.argument(InputValue::new(arg.name, scalar_type_ref(arg.kind)));
    }

    field
}

/// Create the list field of a collection with `limit`, `offset`, `sort` and
/// `sortDesc` arguments.
pub fn create_list_resolver(field_name: &str, type_name: &str, rows: Arc<Collection>) -> Field {
    Field::new(
        field_name,
        TypeRef::named_list(type_name),
        move |ctx: ResolverContext| {
            let rows = rows.clone();

            FieldFuture::new(async move {
                let query = ListQuery::from_context(&ctx);
                tracing::debug!(?query, "Resolving row list");

                let results: Vec<FieldValue> = query.apply(&rows).into_iter().map(row_value).collect();
                Ok(Some(FieldValue::list(results)))
            })
        },
    )
    .argument(InputValue::new("limit", TypeRef::named(TypeRef::INT)))
    .argument(InputValue::new("offset", TypeRef::named(TypeRef::INT)))
    .argument(InputValue::new("sort", TypeRef::named(TypeRef::STRING)))
    .argument(InputValue::new("sortDesc", TypeRef::named(TypeRef::STRING)))
}

/// Create a field `field_name` projecting `column` of the parent row.
pub fn create_column_resolver(
    field_name: &str,
    column: &str,
    kind: ScalarKind,
    description: &str,
) -> Field {
    let column_for_closure = column.to_string();

    let field = Field::new(field_name, scalar_type_ref(kind), move |ctx: ResolverContext| {
        let column = column_for_closure.clone();

        FieldFuture::new(async move {
            let row = ctx.parent_value.try_downcast_ref::<Row>()?;
            match to_graphql_value(row.get(column.as_str()), kind) {
                Value::Null => Ok(None),
                value => Ok(Some(FieldValue::value(value))),
            }
        })
    });

    if description.is_empty() {
        field
    } else {
        field.description(description)
    }
}

/// Create a relation field resolving the parent's `column` against the
/// `id` column of `related`.
pub fn create_relation_resolver(
    field_name: &str,
    column: &str,
    target_type: &str,
    related: Option<Arc<Collection>>,
) -> Field {
    let column_for_closure = column.to_string();

    Field::new(field_name, TypeRef::named(target_type), move |ctx: ResolverContext| {
        let column = column_for_closure.clone();
        let related = related.clone();

        FieldFuture::new(async move {
            let row = ctx.parent_value.try_downcast_ref::<Row>()?;
            let Some(related) = related else {
                return Ok(None);
            };
            Ok(find_by_id(&related, row.get(column.as_str())).map(row_value))
        })
    })
}

/// Create a field returning a whole dataset, typed as its dataset object.
pub fn create_dataset_resolver(
    field_name: &str,
    type_name: &str,
    dataset: Arc<SharedDataset>,
) -> Field {
    Field::new(field_name, TypeRef::named(type_name), move |_ctx: ResolverContext| {
        let dataset = dataset.clone();
        FieldFuture::new(async move { Ok(Some(FieldValue::owned_any(dataset))) })
    })
}

/// Placeholder field for a schema or dataset without any data.
pub fn create_no_data_resolver() -> Field {
    Field::new("no_data", TypeRef::named(TypeRef::STRING), |_ctx: ResolverContext| {
        FieldFuture::new(async move { Ok(Some(FieldValue::value(Value::String("no data".to_string())))) })
    })
    .description("No API yet")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rows(values: Vec<JsonValue>) -> Vec<Row> {
        values
            .into_iter()
            .map(|value| serde_json::from_value(value).unwrap())
            .collect()
    }

    fn names(selected: &[&Row]) -> Vec<String> {
        selected
            .iter()
            .map(|row| row["name"].as_str().unwrap().to_string())
            .collect()
    }

    fn people() -> Vec<Row> {
        rows(vec![
            json!({"id": "1", "name": "delta", "age": "40"}),
            json!({"id": "2", "name": "alpha", "age": "30"}),
            json!({"id": "3", "name": "echo", "age": "30"}),
            json!({"id": "4", "name": "bravo", "age": "20"}),
            json!({"id": "5", "name": "charlie", "age": "50"}),
        ])
    }

    #[test]
    fn test_find_row_by_index() {
        let rows = people();
        assert_eq!(find_row(&rows, Some(1), None).unwrap()["name"], json!("alpha"));
        assert!(find_row(&rows, Some(5), None).is_none());
        assert!(find_row(&rows, Some(-1), None).is_none());
    }

    #[test]
    fn test_find_row_index_wins_over_filter() {
        let rows = people();
        let found = find_row(&rows, Some(0), Some(("name", &json!("echo")))).unwrap();
        assert_eq!(found["name"], json!("delta"));
    }

    #[test]
    fn test_find_row_by_loose_filter() {
        let rows = people();
        let found = find_row(&rows, None, Some(("age", &json!(30)))).unwrap();
        assert_eq!(found["name"], json!("alpha"));
        assert!(find_row(&rows, None, Some(("age", &json!(99)))).is_none());
        assert!(find_row(&rows, None, None).is_none());
    }

    #[test]
    fn test_find_by_id_is_strict() {
        let authors = rows(vec![json!({"id": "1"}), json!({"id": 2})]);
        assert!(find_by_id(&authors, Some(&json!("1"))).is_some());
        assert!(find_by_id(&authors, Some(&json!(1))).is_none());
        assert!(find_by_id(&authors, Some(&json!(2.0))).is_some());
        assert!(find_by_id(&authors, None).is_none());
    }

    #[test]
    fn test_sort_ascending_is_stable() {
        let rows = people();
        let query = ListQuery {
            sort: Some("age".to_string()),
            ..Default::default()
        };
        assert_eq!(names(&query.apply(&rows)), vec!["bravo", "alpha", "echo", "delta", "charlie"]);
    }

    #[test]
    fn test_sort_desc_matches_sort() {
        let rows = people();
        let ascending = ListQuery {
            sort: Some("name".to_string()),
            ..Default::default()
        };
        let descending = ListQuery {
            sort_desc: Some("name".to_string()),
            ..Default::default()
        };
        assert_eq!(names(&ascending.apply(&rows)), names(&descending.apply(&rows)));
        assert_eq!(
            names(&ascending.apply(&rows)),
            vec!["alpha", "bravo", "charlie", "delta", "echo"]
        );
    }

    #[test]
    fn test_sort_desc_applied_last() {
        let rows = people();
        let query = ListQuery {
            sort: Some("name".to_string()),
            sort_desc: Some("age".to_string()),
            ..Default::default()
        };
        // Ties on age keep the order produced by the name sort
        assert_eq!(names(&query.apply(&rows)), vec!["bravo", "alpha", "echo", "delta", "charlie"]);
    }

    #[test]
    fn test_offset_then_limit() {
        let rows = people();
        let query = ListQuery {
            offset: Some(2),
            limit: Some(1),
            ..Default::default()
        };
        let selected = query.apply(&rows);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0]["id"], json!("3"));
    }

    #[test]
    fn test_zero_and_negative_bounds() {
        let rows = people();
        let zero = ListQuery {
            offset: Some(0),
            limit: Some(0),
            ..Default::default()
        };
        assert_eq!(zero.apply(&rows).len(), 5);

        let tail = ListQuery {
            offset: Some(-2),
            ..Default::default()
        };
        assert_eq!(names(&tail.apply(&rows)), vec!["bravo", "charlie"]);

        let past_end = ListQuery {
            offset: Some(10),
            ..Default::default()
        };
        assert!(past_end.apply(&rows).is_empty());
    }

    #[test]
    fn test_apply_leaves_input_order() {
        let rows = people();
        let query = ListQuery {
            sort: Some("name".to_string()),
            ..Default::default()
        };
        let _ = query.apply(&rows);
        assert_eq!(rows[0]["name"], json!("delta"));
    }

    #[test]
    fn test_column_and_list_resolvers_execute() {
        use async_graphql::dynamic::{Object, Schema};

        let person = Object::new("person")
            .field(create_column_resolver("name", "name", ScalarKind::String, ""))
            .field(create_column_resolver("years", "age", ScalarKind::Int, "Min value: 20"));
        let query = Object::new("root").field(create_list_resolver(
            "persons",
            "person",
            Arc::new(people()),
        ));
        let schema = Schema::build("root", None, None)
            .register(person)
            .register(query)
            .finish()
            .unwrap();

        let response = tokio_test::block_on(
            schema.execute(r#"{ persons(sort: "age", limit: 2) { name years } }"#),
        );
        assert!(response.errors.is_empty(), "{:?}", response.errors);
        assert_eq!(
            response.data.into_json().unwrap(),
            json!({"persons": [{"name": "bravo", "years": 20}, {"name": "alpha", "years": 30}]})
        );
    }
}
