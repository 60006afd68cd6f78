use thiserror::Error;

#[derive(Error, Debug)]
pub enum SheetqlError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to load '{path}': {message}")]
    Load { path: String, message: String },

    #[error("Schema generation error: {0}")]
    SchemaGeneration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for SheetqlError {
    fn from(err: toml::de::Error) -> Self {
        SheetqlError::Config(format!("TOML parse error: {}", err))
    }
}

impl From<toml::ser::Error> for SheetqlError {
    fn from(err: toml::ser::Error) -> Self {
        SheetqlError::Serialization(format!("TOML serialization error: {}", err))
    }
}

impl From<::config::ConfigError> for SheetqlError {
    fn from(err: ::config::ConfigError) -> Self {
        SheetqlError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SheetqlError>;
