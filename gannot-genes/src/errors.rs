use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GeneLookupError {
    #[error("No such gene: {0}")]
    NoSuchGene(String),
    #[error("No gene id starts with: {0}")]
    NoSuchGeneId(String),
    #[error("Gene {0} has no TSS rows")]
    EmptyTssTable(String),
}

#[derive(Error, Debug)]
pub enum ChromGeometryError {
    #[error("Chromosome geometry file not found: {0}")]
    NotFound(PathBuf),
    #[error("Malformed line {line}: {reason}")]
    ParseError { line: usize, reason: String },
    #[error("Unknown assembly: {0}")]
    UnknownAssembly(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
