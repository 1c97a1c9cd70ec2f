//! Genome-wide interval indexing for overlap queries across chromosomes.
//!
//! [`MultiChromOverlapper`] keeps one [`Bits`] per chromosome. It is built
//! from an [`IntervalTable`] (optionally widened on both sides) and queried
//! with [`Region`]s, the usual shape of a peak file.
//!
//! ```
//! use gannot_core::models::{FeatureRow, IntervalTable, Region, Strand};
//! use gannot_overlaprs::multi_chrom_overlapper::IntoMultiChromOverlapper;
//!
//! let table = IntervalTable::from(vec![FeatureRow {
//!     chr: "chr1".to_string(),
//!     start: 1000,
//!     end: 1000,
//!     strand: Strand::Plus,
//!     gene_name: "GENE1".to_string(),
//!     gene_id: "ENSG1".to_string(),
//!     gene_type: "protein_coding".to_string(),
//! }]);
//!
//! let index = (&table).into_multi_chrom_overlapper(300);
//! let peak = Region { chr: "chr1".to_string(), start: 1200, end: 1250, rest: None };
//! assert_eq!(index.find_region(&peak).len(), 1);
//! ```

use std::fmt::Debug;

use fxhash::FxHashMap;
use gannot_core::models::{IntervalTable, Region};
use num_traits::{PrimInt, Unsigned};

use crate::{Bits, Interval, Overlapper};

/// Per-chromosome [`Bits`] indices.
pub struct MultiChromOverlapper<I, T>
where
    I: PrimInt + Unsigned + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    index_maps: FxHashMap<String, Bits<I, T>>,
}

impl<I, T> MultiChromOverlapper<I, T>
where
    I: PrimInt + Unsigned + Send + Sync + Debug,
    T: Eq + Clone + Send + Sync + Debug,
{
    pub fn from_intervals(intervals: FxHashMap<String, Vec<Interval<I, T>>>) -> Self {
        let index_maps = intervals
            .into_iter()
            .map(|(chr, chr_intervals)| (chr, Bits::build(chr_intervals)))
            .collect();
        MultiChromOverlapper { index_maps }
    }

    /// Intervals on `chr` overlapping `[start, end)`. Unknown chromosomes
    /// yield nothing.
    pub fn find_iter<'a>(
        &'a self,
        chr: &str,
        start: I,
        end: I,
    ) -> Box<dyn Iterator<Item = &'a Interval<I, T>> + 'a> {
        match self.index_maps.get(chr) {
            Some(bits) => bits.find_iter(start, end),
            None => Box::new(std::iter::empty()),
        }
    }
}

impl<T> MultiChromOverlapper<u32, T>
where
    T: Eq + Clone + Send + Sync + Debug,
{
    pub fn find_region(&self, region: &Region) -> Vec<&Interval<u32, T>> {
        self.find_iter(&region.chr, region.start, region.end)
            .collect()
    }

    /// Number of intervals overlapping `region`, without collecting them.
    pub fn count_region(&self, region: &Region) -> usize {
        self.index_maps
            .get(&region.chr)
            .map_or(0, |bits| bits.count(region.start, region.end))
    }
}

/// Conversion of a table into a [`MultiChromOverlapper`].
pub trait IntoMultiChromOverlapper<I, T>
where
    I: PrimInt + Unsigned + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    /// Build the index with every interval widened by `extend` on both ends
    /// (starts clamped at zero).
    fn into_multi_chrom_overlapper(self, extend: u32) -> MultiChromOverlapper<I, T>;
}

impl IntoMultiChromOverlapper<u32, usize> for &IntervalTable {
    /// Payloads are row positions in the table.
    fn into_multi_chrom_overlapper(self, extend: u32) -> MultiChromOverlapper<u32, usize> {
        let mut intervals: FxHashMap<String, Vec<Interval<u32, usize>>> = FxHashMap::default();

        for (idx, row) in self.iter().enumerate() {
            let widened = row.expand(extend, extend);
            intervals
                .entry(row.chr.clone())
                .or_default()
                .push(Interval {
                    start: widened.start,
                    end: widened.end,
                    val: idx,
                });
        }

        MultiChromOverlapper::from_intervals(intervals)
    }
}
