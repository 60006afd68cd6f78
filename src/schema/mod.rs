//! GraphQL schema generation from tabular data
//!
//! This module infers column types, detects relations by naming convention
//! and assembles a dynamic GraphQL schema with lookup and list resolvers.

mod builder;
mod inference;
mod naming;
mod resolver;
mod type_mapping;

pub use builder::{BuildContext, CollectionPlan, DatasetPlan, FieldPlan, SchemaBuilder};
pub use inference::{infer_type, Coercion, Inference, ScalarKind, UNKNOWN_TYPE_DESCRIPTION};
pub use naming::{
    field_name, plural_field_name, singular_name, IdSuffix, RelationConvention, TypeNameRegistry,
    ROOT_TYPE_NAME,
};
pub use resolver::{find_by_id, find_row, ListQuery, LookupArgument};
pub use type_mapping::{argument_kind, scalar_type_ref, to_graphql_value};
