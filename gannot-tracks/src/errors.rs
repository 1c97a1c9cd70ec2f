use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrackError {
    #[error("Failed to open track {path}: {reason}")]
    Open { path: String, reason: String },
    #[error("Failed to read {chr}:{start}-{end}: {reason}")]
    Read {
        chr: String,
        start: u32,
        end: u32,
        reason: String,
    },
    #[error("Chromosome {0} is not present in the track")]
    UnknownChromosome(String),
    #[error("Track rows have unequal widths: expected {expected}, found {found}")]
    RaggedRows { expected: usize, found: usize },
    #[error("Task {task} returned {found} values, expected {expected}")]
    ShapeMismatch {
        task: usize,
        expected: usize,
        found: usize,
    },
    #[error(transparent)]
    Shape(#[from] ndarray::ShapeError),
    #[error(transparent)]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    #[error(transparent)]
    Npy(#[from] ndarray_npy::WriteNpyError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
