//! Tabular input model
//!
//! Rows are ordered maps of scalar JSON values, grouped into named
//! collections (sheets), datasets (one per source file) and a catalog
//! (everything a single schema build sees).

pub mod loader;
mod value;

use indexmap::IndexMap;
use serde_json::Value as JsonValue;
use std::sync::Arc;

pub use loader::load_catalog;
pub(crate) use value::format_float;
pub use value::{compare_sort_keys, display_value, is_normal_integer, is_truthy, loose_eq, to_number};

/// One record; key order is the column order of the source.
pub type Row = IndexMap<String, JsonValue>;

/// Ordered rows sharing a name, e.g. one spreadsheet sheet.
pub type Collection = Vec<Row>;

/// Collections of one source file, in declaration order.
pub type Dataset = IndexMap<String, Collection>;

/// Datasets keyed by source name; the input of a full schema build.
pub type Catalog = IndexMap<String, Dataset>;

/// Dataset whose collections are shared with the resolvers serving them.
pub type SharedDataset = IndexMap<String, Arc<Collection>>;
