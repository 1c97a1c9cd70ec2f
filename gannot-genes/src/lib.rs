//! Gene-level views over a gannot annotation table.
//!
//! This crate turns the normalized TSS table from `gannot-core` into genes
//! and gene sets, and answers region questions against it:
//!
//! - Looking up a [`Gene`] by name or gene id prefix
//! - Building a [`GeneSet`] from a list of names
//! - Deriving protein-coding gene bodies
//! - Left-joining a peak set against TSS windows
//! - Querying rows strictly inside a region
//!
//! It also reads chromosome sizes and AGP gap files, and resolves GENCODE
//! release file names per assembly.
//!
//! # Example
//!
//! ```no_run
//! use gannot_genes::AnnotationIndex;
//! use gannot_core::models::DEFAULT_EXCLUDED_CHROMOSOMES;
//!
//! let index = AnnotationIndex::from_gtf("gencode.v44.basic.annotation.gtf.gz", &DEFAULT_EXCLUDED_CHROMOSOMES).unwrap();
//!
//! let gene = index.get_gene("TP53").unwrap();
//! let window = gene.genomic_range(1000, 1000);
//!
//! let genes = index.get_genes(&["TP53", "MYC", "NOT_A_GENE"]);
//! assert!(genes.len() <= 3);
//! ```

pub mod chrom;
pub mod errors;
pub mod gencode;
pub mod gene;
pub mod gene_set;
pub mod index;
pub mod join;
pub mod tss;

// re-exports
pub use chrom::{AgpRecord, ChromGaps, ChromSizes};
pub use gencode::{Assembly, GencodeRelease};
pub use gene::{DEFAULT_RANGE_WINDOW, DEFAULT_TSS_WINDOW, Gene, GenomicRange};
pub use gene_set::GeneSet;
pub use index::{AnnotationIndex, DEFAULT_JOIN_EXTENSION};
pub use join::PeakJoinRow;
pub use tss::Tss;
