use std::fmt::{self, Display};

use crate::models::Strand;

/// A raw annotation record as handed over by a parser, before normalization.
///
/// Coordinates are 0-based, half-open. Attribute values that the source did
/// not carry are `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureRecord {
    pub feature: String,
    pub chr: String,
    pub start: u32,
    pub end: u32,
    pub strand: Strand,
    pub gene_name: Option<String>,
    pub gene_id: Option<String>,
    pub gene_type: Option<String>,
}

impl FeatureRecord {
    pub fn is_transcript(&self) -> bool {
        self.feature == "transcript"
    }

    /// Coordinate of the transcription start: `start` on `+`, `end` on `-`.
    pub fn tss(&self) -> Option<u32> {
        match self.strand {
            Strand::Plus => Some(self.start),
            Strand::Minus => Some(self.end),
            Strand::Unstranded => None,
        }
    }
}

///
/// One normalized row of an [`IntervalTable`](crate::models::IntervalTable).
///
/// Rows produced by loading carry `start == end == TSS`; rows produced by
/// window expansion or gene body derivation span a real interval.
///
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FeatureRow {
    pub chr: String,
    pub start: u32,
    pub end: u32,
    pub strand: Strand,
    pub gene_name: String,
    pub gene_id: String,
    pub gene_type: String,
}

impl FeatureRow {
    pub fn width(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    /// Widen the row by `upstream` on the left and `downstream` on the right.
    /// The start is clamped at zero.
    pub fn expand(&self, upstream: u32, downstream: u32) -> FeatureRow {
        FeatureRow {
            start: self.start.saturating_sub(upstream),
            end: self.end.saturating_add(downstream),
            ..self.clone()
        }
    }

    /// Half-open overlap test against `[start, end)`.
    pub fn overlaps(&self, start: u32, end: u32) -> bool {
        self.start < end && self.end > start
    }

    pub fn as_string(&self) -> String {
        format!(
            "{}\t{}\t{}\t{}\t{}\t{}\t{}",
            self.chr,
            self.start,
            self.end,
            self.strand,
            self.gene_name,
            self.gene_id,
            self.gene_type
        )
    }
}

impl Display for FeatureRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_string())
    }
}

/// Column names matching [`FeatureRow::as_string`].
pub const FEATURE_ROW_HEADER: &str = "Chromosome\tStart\tEnd\tStrand\tgene_name\tgene_id\tgene_type";
