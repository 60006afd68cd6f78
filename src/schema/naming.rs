//! Naming conventions for generated types and fields
//!
//! Collections are exposed under a singular name (one trailing `s` removed)
//! and a plural name (the singular plus `s`). Columns named `<target>Id`
//! point at the collection for `<target>`.

use std::collections::HashMap;

/// Name of the root query type of a full build.
pub const ROOT_TYPE_NAME: &str = "root";

const BUILTIN_TYPE_NAMES: [&str; 5] = ["String", "Int", "Float", "Boolean", "ID"];

/// Collection name with a single trailing `s` removed.
pub fn singular_name(collection: &str) -> String {
    collection.strip_suffix('s').unwrap_or(collection).to_string()
}

/// Name of the list field for a singular name; always the singular plus `s`.
pub fn plural_field_name(singular: &str) -> String {
    format!("{}s", singular)
}

/// Detects foreign-key columns and locates the collection they point at.
pub trait RelationConvention: Send + Sync {
    /// The singular name of the related collection, if `field` is a relation.
    fn relation_target<'a>(&self, field: &'a str) -> Option<&'a str>;

    /// Key of the collection holding rows for `target`.
    fn collection_key(&self, target: &str) -> String;
}

/// `authorId` refers to the `author` type, whose rows live in `authors`.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdSuffix;

impl RelationConvention for IdSuffix {
    fn relation_target<'a>(&self, field: &'a str) -> Option<&'a str> {
        if field == "id" {
            return None;
        }
        field.strip_suffix("Id")
    }

    fn collection_key(&self, target: &str) -> String {
        let key = format!("{}s", target);
        match key.strip_suffix("ss") {
            Some(stem) => format!("{}s", stem),
            None => key,
        }
    }
}

/// Hands out unique, syntactically valid GraphQL type names for one build.
///
/// The first use of a name keeps it as-is; later uses get `_1`, `_2`, ...
#[derive(Debug, Clone)]
pub struct TypeNameRegistry {
    counts: HashMap<String, usize>,
}

impl TypeNameRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            counts: HashMap::new(),
        };
        registry.reserve(ROOT_TYPE_NAME);
        for name in BUILTIN_TYPE_NAMES {
            registry.reserve(name);
        }
        registry
    }

    /// Mark `name` as taken without handing it out.
    pub fn reserve(&mut self, name: &str) {
        self.counts.entry(name.to_string()).or_insert(1);
    }

    pub fn sanitize(&mut self, name: &str) -> String {
        let clean = clean_type_name(name);
        match self.counts.get_mut(&clean) {
            Some(count) => {
                *count += 1;
                format!("{}_{}", clean, *count - 1)
            }
            None => {
                self.counts.insert(clean.clone(), 1);
                clean
            }
        }
    }
}

impl Default for TypeNameRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Field or argument name exposed for a raw sheet, file or column name.
///
/// Uses the same cleaning as type names but never adds a collision suffix;
/// the raw name stays the key used to read rows.
pub fn field_name(raw: &str) -> String {
    let clean = clean_type_name(raw);
    if clean != raw {
        tracing::warn!("Name '{}' is not a valid GraphQL name, exposing it as '{}'", raw, clean);
    }
    clean
}

/// `.` and `/` (and anything else GraphQL rejects) become `_`.
fn clean_type_name(name: &str) -> String {
    let mut clean: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if clean.is_empty() || clean.starts_with(|c: char| c.is_ascii_digit()) {
        clean.insert(0, '_');
    }
    clean
}
