//! Signal tracks for gannot genes.
//!
//! A [`TrackReader`] serves values over genomic windows; [`BigWigTrack`]
//! implements it for bigWig files. [`GeneTrackExt`] reads around a single
//! gene, and [`aggregate_tss_tracks`] reads around every gene of a
//! [`GeneSet`](gannot_genes::GeneSet) on a rayon worker pool.
//!
//! # Example
//!
//! ```no_run
//! use gannot_genes::AnnotationIndex;
//! use gannot_core::models::DEFAULT_EXCLUDED_CHROMOSOMES;
//! use gannot_tracks::{BigWigTrack, TrackOptions, aggregate_tss_tracks, DEFAULT_WORKERS};
//!
//! let index = AnnotationIndex::from_gtf("annotation.gtf.gz", &DEFAULT_EXCLUDED_CHROMOSOMES).unwrap();
//! let genes = index.get_genes(&["MYC", "TP53"]);
//! let track = BigWigTrack::open("signal.bw").unwrap();
//!
//! let result = aggregate_tss_tracks(&genes, &track, 1000, 1000, DEFAULT_WORKERS, &TrackOptions::default()).unwrap();
//! result.write_npy("tss_signal.npy").unwrap();
//! ```

pub mod aggregate;
pub mod bigwig;
pub mod errors;
pub mod gene_track;
pub mod track;

// re-exports
pub use aggregate::{DEFAULT_WORKERS, TrackTask, TssAggregation, aggregate_tss_tracks, plan_tasks};
pub use bigwig::BigWigTrack;
pub use errors::TrackError;
pub use gene_track::GeneTrackExt;
pub use track::{Track, TrackOptions, TrackReader, TrackResult};
