pub mod config;
pub mod data;
pub mod error;
pub mod schema;

// Re-export commonly used types
pub use config::{Config, ServerConfig, SourceConfig};
pub use data::{Catalog, Collection, Dataset, Row};
pub use error::{Result, SheetqlError};
pub use schema::SchemaBuilder;
