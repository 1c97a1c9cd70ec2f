//! A gene and the windows derived from its TSS rows.

use std::fmt::{self, Display};

use gannot_core::models::{FeatureRow, IntervalTable, Strand};
use serde::{Deserialize, Serialize};

use crate::errors::GeneLookupError;
use crate::tss::Tss;

/// Default flank used by [`Gene::genomic_range`].
pub const DEFAULT_RANGE_WINDOW: u32 = 128 * 8192;

/// Default flank used by [`Gene::tss_window`].
pub const DEFAULT_TSS_WINDOW: u32 = 1000;

/// A `(chromosome, start, end, strand)` window around a gene.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GenomicRange {
    pub chr: String,
    pub start: u32,
    pub end: u32,
    pub strand: Strand,
}

impl GenomicRange {
    pub fn width(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }
}

impl Display for GenomicRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}-{} ({})", self.chr, self.start, self.end, self.strand)
    }
}

///
/// A gene together with all of its TSS rows.
///
/// The identity (name, id, chromosome, strand) is taken from the first row of
/// the table at construction time. A gene always has at least one TSS row.
///
#[derive(Debug, Clone, PartialEq)]
pub struct Gene {
    name: String,
    id: String,
    chr: String,
    strand: Strand,
    tss_table: IntervalTable,
    tss_min: u32,
    tss_max: u32,
}

impl Gene {
    ///
    /// Build a gene from its TSS rows.
    ///
    /// # Arguments
    ///
    /// - rows: TSS rows of the gene, in table order
    ///
    pub fn from_rows(rows: Vec<FeatureRow>) -> Result<Self, GeneLookupError> {
        let first = rows
            .first()
            .ok_or_else(|| GeneLookupError::EmptyTssTable(String::new()))?;

        let name = first.gene_name.clone();
        let id = first.gene_id.clone();
        let chr = first.chr.clone();
        let strand = first.strand;

        let (tss_min, tss_max) = rows
            .iter()
            .fold((u32::MAX, u32::MIN), |(lo, hi), row| {
                (lo.min(row.start), hi.max(row.start))
            });

        Ok(Gene {
            name,
            id,
            chr,
            strand,
            tss_table: IntervalTable::from(rows),
            tss_min,
            tss_max,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn chr(&self) -> &str {
        &self.chr
    }

    pub fn strand(&self) -> Strand {
        self.strand
    }

    pub fn tss_table(&self) -> &IntervalTable {
        &self.tss_table
    }

    pub fn tss_min(&self) -> u32 {
        self.tss_min
    }

    pub fn tss_max(&self) -> u32 {
        self.tss_max
    }

    /// One [`Tss`] per row of the TSS table, in table order.
    pub fn tss(&self) -> Vec<Tss> {
        self.tss_table.iter().map(Tss::from).collect()
    }

    ///
    /// Window around the smallest TSS, regardless of strand:
    /// `[min - upstream, min + downstream)`, clamped at zero.
    ///
    pub fn genomic_range(&self, upstream: u32, downstream: u32) -> GenomicRange {
        GenomicRange {
            chr: self.chr.clone(),
            start: self.tss_min.saturating_sub(upstream),
            end: self.tss_min.saturating_add(downstream),
            strand: self.strand,
        }
    }

    ///
    /// Strand-aware window around the gene's outermost TSS.
    ///
    /// `+` genes anchor on the smallest TSS and extend `upstream` to the left;
    /// other genes anchor on the largest TSS and extend `upstream` to the right.
    ///
    pub fn tss_window(&self, upstream: u32, downstream: u32) -> GenomicRange {
        let (start, end) = match self.strand {
            Strand::Plus => (
                self.tss_min.saturating_sub(upstream),
                self.tss_min.saturating_add(downstream),
            ),
            _ => (
                self.tss_max.saturating_sub(downstream),
                self.tss_max.saturating_add(upstream),
            ),
        };
        GenomicRange {
            chr: self.chr.clone(),
            start,
            end,
            strand: self.strand,
        }
    }
}

impl Display for Gene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Gene {} ({}) at {}:{} ({}), {} TSS",
            self.name,
            self.id,
            self.chr,
            self.tss_min,
            self.strand,
            self.tss_table.len()
        )
    }
}
