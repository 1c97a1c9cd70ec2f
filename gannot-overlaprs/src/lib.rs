//! Genomic interval overlap operations for gannot.
//!
//! The workhorse is [`Bits`], a binary interval search list, wrapped per
//! chromosome by [`MultiChromOverlapper`](multi_chrom_overlapper::MultiChromOverlapper).
//! All overlap computation in the workspace goes through this crate.
//!
//! ```rust
//! use gannot_overlaprs::{Bits, Interval, Overlapper};
//!
//! let peaks = vec![
//!     Interval { start: 100u32, end: 200, val: "peak1" },
//!     Interval { start: 150, end: 300, val: "peak2" },
//!     Interval { start: 400, end: 500, val: "peak3" },
//! ];
//!
//! let bits = Bits::build(peaks);
//! let overlaps = bits.find(180, 250);
//! assert_eq!(overlaps.len(), 2);
//! ```

/// Binary Interval Search implementation.
pub mod bits;

/// Genome-wide interval indexing.
pub mod multi_chrom_overlapper;

/// Core traits for overlap operations.
pub mod traits;

// re-exports
pub use self::bits::Bits;
pub use self::traits::{Interval, Overlapper};
