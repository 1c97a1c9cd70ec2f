use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnnotationError {
    #[error("Annotation source not found: {0}")]
    NotFound(PathBuf),

    #[error("Error parsing annotation record at line {line}: {reason}")]
    RecordParseError { line: usize, reason: String },

    #[error("Error parsing region: {0}")]
    RegionParseError(String),

    #[error("Invalid strand value: {0}")]
    InvalidStrand(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
