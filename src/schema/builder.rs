//! GraphQL schema builder
//!
//! This module provides the `SchemaBuilder` which generates a complete GraphQL
//! schema from tabular datasets. A build runs in two phases: every collection
//! is first planned as plain data (type names, inferred columns, relations,
//! coerced rows), then the dynamic object types and resolvers are assembled
//! from those plans.

use crate::data::{Catalog, Collection, Dataset, Row, SharedDataset};
use crate::error::{Result, SheetqlError};
use crate::schema::inference::{infer_type, ScalarKind};
use crate::schema::naming::{
    field_name, plural_field_name, singular_name, IdSuffix, RelationConvention,
    TypeNameRegistry, ROOT_TYPE_NAME,
};
use crate::schema::resolver::{
    create_column_resolver, create_dataset_resolver, create_get_resolver, create_list_resolver,
    create_no_data_resolver, create_relation_resolver, LookupArgument, ROW_ARGUMENT,
};
use crate::schema::type_mapping::argument_kind;

use async_graphql::dynamic::{Field, Object, Schema};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// One field of a collection type
#[derive(Debug, Clone, PartialEq)]
pub enum FieldPlan {
    /// Exposes `column` of the row as `name`.
    Column {
        name: String,
        column: String,
        kind: ScalarKind,
        description: String,
    },
    /// Looks up the row of `related_key` whose `id` equals the row's `column`.
    Relation {
        name: String,
        column: String,
        target_type: String,
        related_key: String,
    },
}

/// Everything needed to assemble the type and query fields of one collection
#[derive(Debug, Clone)]
pub struct CollectionPlan {
    pub collection: String,
    /// Exposed name of the singular field
    pub singular: String,
    pub type_name: String,
    pub fields: Vec<FieldPlan>,
    pub lookup_args: Vec<LookupArgument>,
    /// Rows with every inferred coercion applied
    pub rows: Collection,
}

/// Plans of one dataset, in the order they are exposed
#[derive(Debug, Clone)]
pub struct DatasetPlan {
    pub name: String,
    pub type_name: String,
    pub collections: Vec<CollectionPlan>,
}

/// State owned by a single build
///
/// Holds the type-name registry and the object types produced so far, so
/// independent builds never observe each other's names.
pub struct BuildContext {
    registry: TypeNameRegistry,
    objects: Vec<Object>,
}

impl BuildContext {
    pub fn new() -> Self {
        Self {
            registry: TypeNameRegistry::new(),
            objects: Vec::new(),
        }
    }

    /// Register every object built so far plus `query`, and finish the schema.
    pub fn finish(self, query: Object) -> Result<Schema> {
        let mut schema_builder = Schema::build(query.type_name(), None, None);

        for object in self.objects {
            schema_builder = schema_builder.register(object);
        }
        schema_builder = schema_builder.register(query);

        schema_builder.finish().map_err(|e| {
            SheetqlError::SchemaGeneration(format!("Failed to build schema: {}", e))
        })
    }
}

impl Default for BuildContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Schema builder for generating GraphQL schemas from tabular data
pub struct SchemaBuilder {
    convention: Box<dyn RelationConvention>,
}

impl SchemaBuilder {
    /// Create a schema builder using the `<target>Id` relation convention
    pub fn new() -> Self {
        Self::with_convention(IdSuffix)
    }

    pub fn with_convention(convention: impl RelationConvention + 'static) -> Self {
        Self {
            convention: Box::new(convention),
        }
    }

    /// Build the complete schema for a catalog
    ///
    /// The `root` query type has one field per dataset. An empty catalog
    /// yields a schema with a single `no_data` field instead of an error.
    pub fn build_root_schema(&self, catalog: &Catalog) -> Result<Schema> {
        let mut ctx = BuildContext::new();
        let mut root = Object::new(ROOT_TYPE_NAME);

        if catalog.is_empty() {
            tracing::warn!("No datasets loaded, exposing placeholder schema");
            root = root.field(create_no_data_resolver());
        }

        let mut exposed = HashSet::new();
        for (name, dataset) in catalog {
            let root_field = field_name(name);
            if !exposed.insert(root_field.clone()) {
                tracing::warn!(
                    "Skipping dataset '{}': field '{}' is already taken",
                    name,
                    root_field
                );
                continue;
            }
            let (type_name, shared) = self.build_dataset_type(&mut ctx, name, dataset);
            root = root.field(create_dataset_resolver(&root_field, &type_name, shared));
        }

        tracing::info!("Built schema for {} datasets", catalog.len());
        ctx.finish(root)
    }

    /// Build a standalone schema whose query type is the dataset type itself
    pub fn build_dataset_schema(&self, name: &str, dataset: &Dataset) -> Result<Schema> {
        let mut ctx = BuildContext::new();
        self.build_dataset_type(&mut ctx, name, dataset);
        let query = ctx.objects.pop().ok_or_else(|| {
            SheetqlError::SchemaGeneration(format!("No type built for dataset '{}'", name))
        })?;
        ctx.finish(query)
    }

    /// Build the object type of a dataset and push it, together with its
    /// collection types, onto `ctx`. The dataset type is pushed last.
    ///
    /// Returns the dataset type name and the coerced collections backing it.
    pub fn build_dataset_type(
        &self,
        ctx: &mut BuildContext,
        name: &str,
        dataset: &Dataset,
    ) -> (String, Arc<SharedDataset>) {
        tracing::info!("Building schema for dataset: {}", name);

        let mut plan = self.plan_dataset(&mut ctx.registry, name, dataset);

        let mut shared = SharedDataset::new();
        for collection in &mut plan.collections {
            shared.insert(
                collection.collection.clone(),
                Arc::new(std::mem::take(&mut collection.rows)),
            );
        }

        let mut object = Object::new(&plan.type_name).description(format!("File {}", name));
        let mut exposed = HashSet::new();

        for collection in &plan.collections {
            ctx.objects.push(self.build_collection_type(collection, &shared));

            let plural = plural_field_name(&collection.singular);
            if !exposed.insert(collection.singular.clone()) || !exposed.insert(plural.clone()) {
                tracing::warn!(
                    "Skipping collection '{}' of '{}': field '{}' or '{}' is already taken",
                    collection.collection,
                    name,
                    collection.singular,
                    plural
                );
                continue;
            }
            let rows = shared.get(&collection.collection).cloned().unwrap_or_default();
            let (get_field, list_field) = self.build_collection_query_fields(collection, rows);
            object = object.field(get_field).field(list_field);
        }

        if plan.collections.is_empty() {
            tracing::warn!("Dataset '{}' has no usable collections", name);
            object = object.field(create_no_data_resolver());
        }

        ctx.objects.push(object);

        // Expose the collections in declaration order
        shared.reverse();
        (plan.type_name, Arc::new(shared))
    }

    /// Plan every collection of a dataset
    ///
    /// Collections are visited in reverse declaration order. All type names
    /// are handed out before any field is planned, so a relation may point at
    /// any collection of the same dataset, including its own.
    pub fn plan_dataset(
        &self,
        registry: &mut TypeNameRegistry,
        name: &str,
        dataset: &Dataset,
    ) -> DatasetPlan {
        let mut related_types: HashMap<String, String> = HashMap::new();
        let mut pending = Vec::new();

        for (collection, rows) in dataset.iter().rev() {
            let Some(first) = rows.first().filter(|row| !row.is_empty()) else {
                tracing::warn!(
                    "Skipping collection '{}' of '{}': no columns in the first row",
                    collection,
                    name
                );
                continue;
            };

            let singular = singular_name(collection);
            let type_name = registry.sanitize(&singular);
            related_types.insert(singular.clone(), type_name.clone());
            pending.push((collection, rows, first, field_name(&singular), type_name));
        }

        let type_name = registry.sanitize(name);

        let collections = pending
            .into_iter()
            .map(|(collection, rows, first, singular, type_name)| {
                self.plan_collection(collection, rows, first, singular, type_name, &related_types)
            })
            .collect();

        DatasetPlan {
            name: name.to_string(),
            type_name,
            collections,
        }
    }

    /// Plan one collection from its first row's columns
    fn plan_collection(
        &self,
        collection: &str,
        rows: &Collection,
        first: &Row,
        singular: String,
        type_name: String,
        related_types: &HashMap<String, String>,
    ) -> CollectionPlan {
        let mut coerced = rows.clone();
        let mut fields = Vec::with_capacity(first.len());
        let mut exposed = HashSet::new();

        for column in first.keys() {
            if column == "id" {
                exposed.insert(column.clone());
                fields.push(FieldPlan::Column {
                    name: column.clone(),
                    column: column.clone(),
                    kind: ScalarKind::Id,
                    description: String::new(),
                });
                continue;
            }

            if let Some(target) = self.convention.relation_target(column) {
                if let Some(target_type) = related_types.get(target) {
                    let name = field_name(target);
                    if !exposed.insert(name.clone()) {
                        warn_taken(collection, column, &name);
                        continue;
                    }
                    fields.push(FieldPlan::Relation {
                        name,
                        column: column.clone(),
                        target_type: target_type.clone(),
                        related_key: self.convention.collection_key(target),
                    });
                    continue;
                }
                tracing::warn!(
                    "Column '{}' of '{}' refers to unknown type '{}', exposing it as a plain column",
                    column,
                    collection,
                    target
                );
            }

            let name = field_name(column);
            if !exposed.insert(name.clone()) {
                warn_taken(collection, column, &name);
                continue;
            }
            let inference = infer_type(column, rows);
            if let Some(coercion) = inference.coercion {
                coercion.apply(column, &mut coerced);
            }
            fields.push(FieldPlan::Column {
                name,
                column: column.clone(),
                kind: inference.kind,
                description: inference.description,
            });
        }

        let mut argument_names = HashSet::from([ROW_ARGUMENT.to_string()]);
        let lookup_args = first
            .iter()
            .filter_map(|(column, sample)| {
                let name = field_name(column);
                argument_names.insert(name.clone()).then(|| LookupArgument {
                    name,
                    column: column.clone(),
                    kind: argument_kind(Some(sample)),
                })
            })
            .collect();

        CollectionPlan {
            collection: collection.to_string(),
            singular,
            type_name,
            fields,
            lookup_args,
            rows: coerced,
        }
    }

    /// Build the object type of a collection from its plan
    pub fn build_collection_type(&self, plan: &CollectionPlan, shared: &SharedDataset) -> Object {
        let mut object = Object::new(&plan.type_name);

        for field in &plan.fields {
            let graphql_field = match field {
                FieldPlan::Column {
                    name,
                    column,
                    kind,
                    description,
                } => create_column_resolver(name, column, *kind, description),
                FieldPlan::Relation {
                    name,
                    column,
                    target_type,
                    related_key,
                } => {
                    let related = shared.get(related_key).cloned();
                    if related.is_none() {
                        tracing::warn!(
                            "Relation '{}' of '{}' has no '{}' collection to look up",
                            name,
                            plan.collection,
                            related_key
                        );
                    }
                    create_relation_resolver(name, column, target_type, related)
                }
            };
            object = object.field(graphql_field);
        }

        object
    }

    /// Build the singular and plural query fields of a collection
    pub fn build_collection_query_fields(
        &self,
        plan: &CollectionPlan,
        rows: Arc<Collection>,
    ) -> (Field, Field) {
        let get_field = create_get_resolver(
            &plan.singular,
            &plan.type_name,
            &format!("{} sheet", plan.collection),
            rows.clone(),
            plan.lookup_args.clone(),
        );
        let list_field =
            create_list_resolver(&plural_field_name(&plan.singular), &plan.type_name, rows);

        (get_field, list_field)
    }
}

fn warn_taken(collection: &str, column: &str, name: &str) {
    tracing::warn!(
        "Skipping column '{}' of '{}': field '{}' is already taken",
        column,
        collection,
        name
    );
}

impl Default for SchemaBuilder {
    fn default() -> Self {
        Self::new()
    }
}
