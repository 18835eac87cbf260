// XML documentation module - sidecar file loading and doc comment parsing

pub mod parser;
pub mod sidecar;

use thiserror::Error;

pub use parser::{DocComment, DocException, DocTypeParam, parse_doc_comment};
pub use sidecar::SidecarDocs;

#[derive(Debug, Error)]
pub enum XmlDocError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("XML parse error: {0}")]
    Parse(#[from] quick_xml::Error),
    #[error("malformed documentation XML: {0}")]
    Malformed(String),
}

pub type Result<T> = std::result::Result<T, XmlDocError>;
