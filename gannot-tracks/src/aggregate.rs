//! Parallel extraction of TSS-anchored track signal for a gene set.
//!
//! The gene set's TSS rows are grouped per chromosome, widened, reduced to
//! one anchor row per gene and strand, and cut into tasks. Tasks run on a
//! fixed-size rayon pool; results are gathered in submission order and
//! stacked into a matrix with one row per task.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::ops::Range;
use std::path::Path;

use fxhash::FxHashMap;
use gannot_core::models::{FeatureRow, IntervalTable, Strand};
use gannot_genes::GeneSet;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info};
use ndarray::Array2;
use ndarray_npy::write_npy;
use rayon::prelude::*;

use crate::errors::TrackError;
use crate::track::{TrackOptions, TrackReader};

/// Default size of the worker pool.
pub const DEFAULT_WORKERS: usize = 96;

/// Chromosomes with more anchor rows than this are split into chunks.
pub const CHUNK_THRESHOLD: usize = 50;

/// Target number of anchor rows per chunk.
pub const ROWS_PER_CHUNK: usize = 4;

/// One unit of work: a chromosome and the `(start, end)` windows to read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackTask {
    pub chr: String,
    pub regions: Vec<(u32, u32)>,
    /// Rows of the realigned region table covered by this task.
    pub rows: Range<usize>,
}

/// Output of [`aggregate_tss_tracks`].
///
/// `matrix` has one row per task, not per region. `tasks[i].rows` tells
/// which rows of `regions` were summed into `matrix` row `i`.
#[derive(Debug, Clone, PartialEq)]
pub struct TssAggregation {
    pub matrix: Array2<f64>,
    pub regions: IntervalTable,
    pub tasks: Vec<TrackTask>,
}

impl TssAggregation {
    pub fn write_npy<P: AsRef<Path>>(&self, path: P) -> Result<(), TrackError> {
        write_npy(path, &self.matrix)?;
        Ok(())
    }

    pub fn write_regions_tsv<P: AsRef<Path>>(&self, path: P) -> Result<(), TrackError> {
        self.regions.to_tsv(path)?;
        Ok(())
    }

    /// Task layout as TSV: matrix row, chromosome, first and last+1 region row.
    pub fn write_tasks_tsv<P: AsRef<Path>>(&self, path: P) -> Result<(), TrackError> {
        let mut writer = BufWriter::new(File::create(path)?);
        writeln!(writer, "row\tChromosome\tregion_start\tregion_end")?;
        for (idx, task) in self.tasks.iter().enumerate() {
            writeln!(
                writer,
                "{}\t{}\t{}\t{}",
                idx, task.chr, task.rows.start, task.rows.end
            )?;
        }
        writer.flush()?;
        Ok(())
    }
}

///
/// Keep one anchor row per gene: the first `+` row and the last `-` row in
/// start order. Each group is ordered by gene name, `+` first. Unstranded
/// rows are dropped.
///
fn select_anchors(rows: Vec<FeatureRow>) -> Vec<FeatureRow> {
    let mut positive: BTreeMap<String, FeatureRow> = BTreeMap::new();
    let mut negative: BTreeMap<String, FeatureRow> = BTreeMap::new();
    let mut unstranded = 0usize;

    for row in rows {
        match row.strand {
            Strand::Plus => {
                positive.entry(row.gene_name.clone()).or_insert(row);
            }
            Strand::Minus => {
                negative.insert(row.gene_name.clone(), row);
            }
            Strand::Unstranded => unstranded += 1,
        }
    }

    if unstranded > 0 {
        debug!("Dropped {} unstranded TSS rows", unstranded);
    }

    positive.into_values().chain(negative.into_values()).collect()
}

/// Contiguous chunk bounds of `len` rows split into `n` parts whose sizes
/// differ by at most one, larger parts first.
fn split_even(len: usize, n: usize) -> Vec<Range<usize>> {
    let n = n.max(1);
    let base = len / n;
    let extra = len % n;

    let mut bounds = Vec::with_capacity(n);
    let mut start = 0;
    for i in 0..n {
        let size = base + usize::from(i < extra);
        bounds.push(start..start + size);
        start += size;
    }
    bounds
}

///
/// Build the realigned region table and the task list without reading any
/// track data.
///
/// # Arguments
///
/// - tss_table: TSS rows of a gene set
/// - upstream: bases subtracted from each start (clamped at zero)
/// - downstream: bases added to each end
///
pub fn plan_tasks(
    tss_table: &IntervalTable,
    upstream: u32,
    downstream: u32,
) -> (IntervalTable, Vec<TrackTask>) {
    let mut per_chrom: FxHashMap<&str, Vec<FeatureRow>> = FxHashMap::default();
    for row in tss_table.iter() {
        per_chrom
            .entry(row.chr.as_str())
            .or_default()
            .push(row.expand(upstream, downstream));
    }

    let mut regions: Vec<FeatureRow> = Vec::new();
    let mut tasks: Vec<TrackTask> = Vec::new();

    for chr in tss_table.iter_chroms() {
        let Some(mut rows) = per_chrom.remove(chr) else {
            continue;
        };
        rows.sort_by_key(|row| row.start);
        let anchors = select_anchors(rows);

        if anchors.is_empty() {
            continue;
        }

        let offset = regions.len();
        let bounds = if anchors.len() > CHUNK_THRESHOLD {
            split_even(anchors.len(), anchors.len() / ROWS_PER_CHUNK)
        } else {
            vec![0..anchors.len()]
        };

        for bound in bounds {
            tasks.push(TrackTask {
                chr: chr.to_string(),
                regions: anchors[bound.clone()]
                    .iter()
                    .map(|row| (row.start, row.end))
                    .collect(),
                rows: offset + bound.start..offset + bound.end,
            });
        }

        regions.extend(anchors);
    }

    (IntervalTable::from(regions), tasks)
}

fn stack_rows(rows: Vec<Vec<f64>>) -> Result<Array2<f64>, TrackError> {
    let n_rows = rows.len();
    let width = rows.first().map_or(0, Vec::len);

    let mut flat = Vec::with_capacity(n_rows * width);
    for (task, row) in rows.into_iter().enumerate() {
        if row.len() != width {
            return Err(TrackError::ShapeMismatch {
                task,
                expected: width,
                found: row.len(),
            });
        }
        flat.extend(row);
    }

    Ok(Array2::from_shape_vec((n_rows, width), flat)?)
}

///
/// Read TSS-anchored signal for every gene of `gene_set`.
///
/// Returns one matrix row per task, gathered in submission order, plus the
/// realigned region table. Any task error aborts the whole run.
///
/// # Arguments
///
/// - gene_set: genes whose TSS rows are read
/// - reader: shared track reader
/// - upstream: bases upstream of each TSS
/// - downstream: bases downstream of each TSS
/// - worker_count: size of the worker pool
/// - options: read options passed to every task
///
pub fn aggregate_tss_tracks<R: TrackReader + ?Sized>(
    gene_set: &GeneSet,
    reader: &R,
    upstream: u32,
    downstream: u32,
    worker_count: usize,
    options: &TrackOptions,
) -> Result<TssAggregation, TrackError> {
    let (regions, tasks) = plan_tasks(gene_set.tss_table(), upstream, downstream);
    info!(
        "Aggregating {} regions from {} genes in {} tasks",
        regions.len(),
        gene_set.len(),
        tasks.len()
    );

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(worker_count.max(1))
        .build()?;

    let bar = ProgressBar::new(tasks.len() as u64);
    if let Ok(style) =
        ProgressStyle::with_template("[{elapsed_precise}] {bar:40.cyan/blue} {pos:>7}/{len:7} {msg}")
    {
        bar.set_style(style.progress_chars("##-"));
    }

    let rows: Result<Vec<Vec<f64>>, TrackError> = pool.install(|| {
        tasks
            .par_iter()
            .map(|task| {
                let result = reader
                    .get_track_for_regions(&task.chr, &task.regions, options)
                    .and_then(|result| result.reduce());
                bar.inc(1);
                result
            })
            .collect()
    });
    bar.finish_and_clear();

    let matrix = stack_rows(rows?)?;

    Ok(TssAggregation {
        matrix,
        regions,
        tasks,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    fn row(chr: &str, pos: u32, strand: Strand, name: &str) -> FeatureRow {
        FeatureRow {
            chr: chr.to_string(),
            start: pos,
            end: pos,
            strand,
            gene_name: name.to_string(),
            gene_id: format!("ID_{}", name),
            gene_type: "protein_coding".to_string(),
        }
    }

    #[rstest]
    fn test_select_anchors_first_plus_last_minus() {
        let rows = vec![
            row("chr1", 100, Strand::Minus, "M"),
            row("chr1", 200, Strand::Plus, "P"),
            row("chr1", 300, Strand::Plus, "P"),
            row("chr1", 400, Strand::Minus, "M"),
            row("chr1", 500, Strand::Unstranded, "U"),
            row("chr1", 600, Strand::Plus, "A"),
        ];
        let anchors: Vec<(String, u32)> = select_anchors(rows)
            .into_iter()
            .map(|r| (r.gene_name, r.start))
            .collect();
        assert_eq!(
            anchors,
            vec![
                ("A".to_string(), 600),
                ("P".to_string(), 200),
                ("M".to_string(), 400),
            ]
        );
    }

    #[rstest]
    #[case(54, 13, vec![5, 5, 4, 4])]
    #[case(60, 15, vec![4, 4, 4, 4])]
    #[case(7, 2, vec![4, 3])]
    fn test_split_even(#[case] len: usize, #[case] n: usize, #[case] head: Vec<usize>) {
        let bounds = split_even(len, n);
        assert_eq!(bounds.len(), n);
        let sizes: Vec<usize> = bounds.iter().map(|b| b.len()).collect();
        assert_eq!(&sizes[..head.len()], &head[..]);
        assert_eq!(bounds.last().map(|b| b.end), Some(len));
    }

    #[rstest]
    fn test_plan_tasks_visits_chromosomes_in_order() {
        let table = IntervalTable::from(vec![
            row("chr2", 5000, Strand::Minus, "B"),
            row("chr1", 1000, Strand::Plus, "A"),
            row("chr2", 300, Strand::Unstranded, "C"),
        ]);
        let (regions, tasks) = plan_tasks(&table, 1000, 1000);

        let spans: Vec<(&str, u32, u32)> = regions
            .iter()
            .map(|r| (r.chr.as_str(), r.start, r.end))
            .collect();
        assert_eq!(spans, vec![("chr2", 4000, 6000), ("chr1", 0, 2000)]);
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].rows, 0..1);
        assert_eq!(tasks[1].regions, vec![(0, 2000)]);
    }

    #[rstest]
    fn test_stack_rows_rejects_ragged_tasks() {
        assert!(matches!(
            stack_rows(vec![vec![1.0, 2.0], vec![1.0]]),
            Err(TrackError::ShapeMismatch { task: 1, expected: 2, found: 1 })
        ));
        assert_eq!(stack_rows(vec![]).unwrap().dim(), (0, 0));
    }
}
