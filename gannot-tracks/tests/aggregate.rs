use std::thread;
use std::time::Duration;

use gannot_core::models::{FeatureRow, Strand};
use gannot_genes::{Gene, GeneSet};
use gannot_tracks::{
    TrackError, TrackOptions, TrackReader, TrackResult, aggregate_tss_tracks,
};
use pretty_assertions::assert_eq;
use rstest::*;

/// Returns `[start, end]` for each requested window.
struct Bounds;

impl TrackReader for Bounds {
    fn get_track(
        &self,
        _chr: &str,
        start: u32,
        end: u32,
        _options: &TrackOptions,
    ) -> Result<Vec<f64>, TrackError> {
        Ok(vec![start as f64, end as f64])
    }
}

/// Returns one vector per task: window count and chromosome name length.
struct Summary;

impl TrackReader for Summary {
    fn get_track(
        &self,
        _chr: &str,
        _start: u32,
        _end: u32,
        _options: &TrackOptions,
    ) -> Result<Vec<f64>, TrackError> {
        Ok(vec![])
    }

    fn get_track_for_regions(
        &self,
        chr: &str,
        regions: &[(u32, u32)],
        _options: &TrackOptions,
    ) -> Result<TrackResult, TrackError> {
        Ok(TrackResult::Vector(vec![regions.len() as f64, chr.len() as f64]))
    }
}

/// Fails on one chromosome.
struct Broken;

impl TrackReader for Broken {
    fn get_track(
        &self,
        chr: &str,
        start: u32,
        end: u32,
        _options: &TrackOptions,
    ) -> Result<Vec<f64>, TrackError> {
        if chr == "chr2" {
            return Err(TrackError::Read {
                chr: chr.to_string(),
                start,
                end,
                reason: "corrupt block".to_string(),
            });
        }
        Ok(vec![0.0; 2])
    }
}

/// Returns a per-chromosome constant; chr1 answers last.
struct SlowFirst;

impl TrackReader for SlowFirst {
    fn get_track(
        &self,
        chr: &str,
        _start: u32,
        _end: u32,
        _options: &TrackOptions,
    ) -> Result<Vec<f64>, TrackError> {
        let value = match chr {
            "chr1" => {
                thread::sleep(Duration::from_millis(300));
                10.0
            }
            "chr2" => 20.0,
            _ => 30.0,
        };
        Ok(vec![value])
    }
}

fn gene(chr: &str, name: &str, strand: Strand, positions: &[u32]) -> Gene {
    let rows = positions
        .iter()
        .map(|&pos| FeatureRow {
            chr: chr.to_string(),
            start: pos,
            end: pos,
            strand,
            gene_name: name.to_string(),
            gene_id: format!("ID_{}", name),
            gene_type: "protein_coding".to_string(),
        })
        .collect();
    Gene::from_rows(rows).unwrap()
}

#[fixture]
fn two_genes() -> GeneSet {
    GeneSet::new(vec![
        gene("chr1", "GENE1", Strand::Plus, &[1000]),
        gene("chr2", "GENE2", Strand::Minus, &[5000]),
    ])
}

fn many_genes(count: usize) -> GeneSet {
    (0..count)
        .map(|i| {
            gene(
                "chr1",
                &format!("G{:03}", i),
                Strand::Plus,
                &[10_000 + 100 * i as u32],
            )
        })
        .collect()
}

#[rstest]
fn test_two_gene_scenario(two_genes: GeneSet) {
    let result =
        aggregate_tss_tracks(&two_genes, &Bounds, 1000, 1000, 2, &TrackOptions::default())
            .unwrap();

    assert_eq!(result.matrix.dim(), (2, 2));
    assert_eq!(result.matrix.row(0).to_vec(), vec![0.0, 2000.0]);
    assert_eq!(result.matrix.row(1).to_vec(), vec![4000.0, 6000.0]);

    let spans: Vec<(u32, u32)> = result.regions.iter().map(|r| (r.start, r.end)).collect();
    assert_eq!(spans, vec![(0, 2000), (4000, 6000)]);
}

#[rstest]
#[case(50, 1)]
#[case(51, 12)]
#[case(54, 13)]
#[case(60, 15)]
fn test_task_count_follows_chunking(#[case] count: usize, #[case] expected_rows: usize) {
    let genes = many_genes(count);
    let result =
        aggregate_tss_tracks(&genes, &Summary, 500, 500, 4, &TrackOptions::default()).unwrap();

    assert_eq!(result.matrix.nrows(), expected_rows);
    assert_eq!(result.tasks.len(), expected_rows);
    assert_eq!(result.regions.len(), count);

    let covered: f64 = result.matrix.column(0).sum();
    assert_eq!(covered as usize, count);
}

#[rstest]
fn test_chunk_rows_map_to_regions() {
    let genes = many_genes(54);
    let result =
        aggregate_tss_tracks(&genes, &Bounds, 0, 0, 4, &TrackOptions::default()).unwrap();

    let first = &result.tasks[0];
    assert_eq!(first.rows, 0..5);
    let expected: f64 = result.regions.rows()[first.rows.clone()]
        .iter()
        .map(|r| r.start as f64)
        .sum();
    assert_eq!(result.matrix[[0, 0]], expected);
}

#[rstest]
fn test_repeat_runs_are_identical() {
    let genes = many_genes(60);
    let options = TrackOptions::default();
    let first = aggregate_tss_tracks(&genes, &Bounds, 1000, 1000, 8, &options).unwrap();
    let second = aggregate_tss_tracks(&genes, &Bounds, 1000, 1000, 3, &options).unwrap();
    assert_eq!(first, second);
}

#[rstest]
fn test_rows_follow_submission_order_when_tasks_finish_out_of_order() {
    let gene_set = GeneSet::new(vec![
        gene("chr1", "GENE1", Strand::Plus, &[1000]),
        gene("chr2", "GENE2", Strand::Plus, &[1000]),
        gene("chr3", "GENE3", Strand::Plus, &[1000]),
    ]);
    let result =
        aggregate_tss_tracks(&gene_set, &SlowFirst, 10, 10, 3, &TrackOptions::default())
            .unwrap();

    assert_eq!(result.matrix.column(0).to_vec(), vec![10.0, 20.0, 30.0]);
    let chroms: Vec<&str> = result.tasks.iter().map(|t| t.chr.as_str()).collect();
    assert_eq!(chroms, vec!["chr1", "chr2", "chr3"]);
}

#[rstest]
fn test_task_failure_aborts(two_genes: GeneSet) {
    let result = aggregate_tss_tracks(&two_genes, &Broken, 10, 10, 2, &TrackOptions::default());
    assert!(matches!(result, Err(TrackError::Read { .. })));
}

#[rstest]
fn test_unstranded_only_gene_set_is_empty() {
    let genes = GeneSet::new(vec![gene("chr3", "U", Strand::Unstranded, &[100])]);
    let result =
        aggregate_tss_tracks(&genes, &Bounds, 10, 10, 1, &TrackOptions::default()).unwrap();
    assert_eq!(result.matrix.dim(), (0, 0));
    assert!(result.regions.is_empty());
    assert!(result.tasks.is_empty());
}

#[rstest]
fn test_outputs_written(two_genes: GeneSet) {
    let dir = tempfile::tempdir().unwrap();
    let result = aggregate_tss_tracks(
        &two_genes,
        &Bounds,
        1000,
        1000,
        1,
        &TrackOptions::default(),
    )
    .unwrap();

    result.write_npy(dir.path().join("matrix.npy")).unwrap();
    result.write_regions_tsv(dir.path().join("regions.tsv")).unwrap();
    result.write_tasks_tsv(dir.path().join("tasks.tsv")).unwrap();

    let tasks = std::fs::read_to_string(dir.path().join("tasks.tsv")).unwrap();
    assert_eq!(tasks.lines().nth(2), Some("1\tchr2\t1\t2"));
    assert!(dir.path().join("matrix.npy").is_file());
}
