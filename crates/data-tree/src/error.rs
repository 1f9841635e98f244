use rb_forest::ForestError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TreeError {
    #[error("{0}")]
    OutOfMemory(#[from] ForestError),
    #[error("module \"{module}\" is not loaded, sorted index metadata unavailable")]
    ConfigurationMissing { module: &'static str },
    #[error("invalid value: {0}")]
    InvalidValue(String),
    #[error("schema mismatch: {0}")]
    SchemaMismatch(String),
    #[error("node is already linked into the data tree")]
    AlreadyLinked,
    #[error("node is not linked into the data tree")]
    NotAttached,
    #[error("metadata name \"{0}\" is reserved")]
    ReservedName(String),
    #[error("invalid context options: {0}")]
    Options(#[from] serde_json::Error),
}
