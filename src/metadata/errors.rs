use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("file not found: {0}")]
    FileNotFound(PathBuf),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("metadata error: {0}")]
    Dotscope(#[from] ::dotscope::Error),
    #[error("assembly symbol resolution failed: {0}")]
    SymbolResolution(String),
    #[error("cancelled")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, MetadataError>;
