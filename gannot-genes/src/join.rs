//! Left join of a peak set against an annotation table.

use std::fmt::{self, Display};
use std::io::Write;

use gannot_core::models::{FEATURE_ROW_HEADER, FeatureRow, IntervalTable, Region};
use gannot_overlaprs::multi_chrom_overlapper::IntoMultiChromOverlapper;
use log::debug;
use serde::{Deserialize, Serialize};

/// Placeholder columns written for peaks without a matching feature.
const UNMATCHED_COLUMNS: &str = ".\t-1\t-1\t.\t.\t.\t.";

/// One output row of [`join_with_peaks`]. `feature` carries the widened
/// annotation interval, or `None` for a peak nothing overlapped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeakJoinRow {
    pub peak: Region,
    pub feature: Option<FeatureRow>,
}

impl PeakJoinRow {
    pub fn is_matched(&self) -> bool {
        self.feature.is_some()
    }

    /// Number of extra peak columns carried in `peak.rest`.
    pub fn peak_field_count(&self) -> usize {
        self.peak.rest.as_deref().map_or(0, |rest| rest.split('\t').count())
    }

    /// Peak columns (including any extra peak fields) followed by the feature
    /// columns.
    pub fn as_string(&self) -> String {
        format!("{}\t{}", self.peak.as_string(), self.feature_columns())
    }

    /// Like [`PeakJoinRow::as_string`], with the extra peak fields padded
    /// with `.` up to `peak_fields` columns.
    pub fn as_padded_string(&self, peak_fields: usize) -> String {
        let mut columns = vec![
            self.peak.chr.clone(),
            self.peak.start.to_string(),
            self.peak.end.to_string(),
        ];
        if let Some(rest) = self.peak.rest.as_deref() {
            columns.extend(rest.split('\t').map(str::to_string));
        }
        columns.resize(3 + peak_fields.max(self.peak_field_count()), ".".to_string());
        columns.push(self.feature_columns());
        columns.join("\t")
    }

    fn feature_columns(&self) -> String {
        match &self.feature {
            Some(row) => row.as_string(),
            None => UNMATCHED_COLUMNS.to_string(),
        }
    }
}

impl Display for PeakJoinRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_string())
    }
}

///
/// Left-join `peaks` against `table` widened by `extend_bp` on both sides.
///
/// Every peak appears at least once: once per overlapping feature (in table
/// order), or once with `feature: None`. Output follows peak order.
///
pub fn join_with_peaks(table: &IntervalTable, peaks: &[Region], extend_bp: u32) -> Vec<PeakJoinRow> {
    let index = table.into_multi_chrom_overlapper(extend_bp);
    let rows = table.rows();
    let mut joined = Vec::with_capacity(peaks.len());

    let mut matched = 0usize;

    for peak in peaks {
        if index.count_region(peak) == 0 {
            joined.push(PeakJoinRow {
                peak: peak.clone(),
                feature: None,
            });
            continue;
        }
        matched += 1;

        let mut hits: Vec<usize> = index.find_region(peak).iter().map(|i| i.val).collect();
        hits.sort_unstable();

        for idx in hits {
            joined.push(PeakJoinRow {
                peak: peak.clone(),
                feature: Some(rows[idx].expand(extend_bp, extend_bp)),
            });
        }
    }

    debug!(
        "Joined {} peaks ({} matched) into {} rows",
        peaks.len(),
        matched,
        joined.len()
    );
    joined
}

///
/// Write joined rows as TSV with a header line.
///
/// Extra peak columns (`Region::rest`) follow the peak coordinates as
/// `peak_field4`, `peak_field5`, ...; rows with fewer fields are padded
/// with `.` so every line has the same width.
///
pub fn write_join_tsv<W: Write>(rows: &[PeakJoinRow], writer: &mut W) -> std::io::Result<()> {
    let peak_fields = rows
        .iter()
        .map(PeakJoinRow::peak_field_count)
        .max()
        .unwrap_or(0);

    let mut header = String::from("peak_chr\tpeak_start\tpeak_end");
    for i in 0..peak_fields {
        header.push_str(&format!("\tpeak_field{}", i + 4));
    }
    writeln!(writer, "{}\t{}", header, FEATURE_ROW_HEADER)?;

    for row in rows {
        writeln!(writer, "{}", row.as_padded_string(peak_fields))?;
    }
    Ok(())
}
