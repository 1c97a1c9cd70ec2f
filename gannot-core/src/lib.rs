//! Core data model for gannot.
//!
//! The central type is [`IntervalTable`](models::IntervalTable): one row per
//! distinct transcription start site, built from the transcript records of
//! an annotation source (usually a GTF file) and normalized so that every
//! gene name maps to exactly one chromosome.
//!
//! ```no_run
//! use gannot_core::models::{IntervalTable, DEFAULT_EXCLUDED_CHROMOSOMES};
//! use gannot_core::sources::GtfSource;
//!
//! let source = GtfSource::new("gencode.v40.basic.annotation.gtf.gz");
//! let table = IntervalTable::load(&source, &DEFAULT_EXCLUDED_CHROMOSOMES).unwrap();
//! println!("{} TSS rows", table.len());
//! ```

pub mod errors;
pub mod models;
pub mod sources;
pub mod utils;
