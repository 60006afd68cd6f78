pub mod init;
pub mod schema;
pub mod serve;

use async_graphql::dynamic::Schema;
use sheetql::config::Config;
use sheetql::data::load_catalog;
use sheetql::error::Result;
use sheetql::schema::SchemaBuilder;

/// Load every source file named by the config and build the root schema
pub fn build_schema_from_config(config: &Config) -> Result<Schema> {
    tracing::info!("📂 Loading spreadsheets from {}", config.source.data_dir);
    let catalog = load_catalog(&config.source.data_dir)?;

    tracing::info!("🔧 Building GraphQL schema for {} files...", catalog.len());
    SchemaBuilder::new().build_root_schema(&catalog)
}
