use std::collections::HashMap;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use bigtools::beddata::BedParserStreamingIterator;
use bigtools::{BigWigWrite, InputSortType};
use ndarray::Array2;
use ndarray_npy::read_npy;
use pretty_assertions::assert_eq;
use rstest::*;
use tempfile::TempDir;

const GTF: &str = "\
##description: test annotation
chr1\tTEST\tgene\t1001\t9000\t.\t+\t.\tgene_id \"ENSG0001.4\"; gene_name \"GENE1\"; gene_type \"protein_coding\";
chr1\tTEST\ttranscript\t1001\t9000\t.\t+\t.\tgene_id \"ENSG0001.4\"; gene_name \"GENE1\"; gene_type \"protein_coding\";
chr1\tTEST\ttranscript\t1501\t9000\t.\t+\t.\tgene_id \"ENSG0001.4\"; gene_name \"GENE1\"; gene_type \"protein_coding\";
chr2\tTEST\ttranscript\t2000\t5000\t.\t-\t.\tgene_id \"ENSG0002.1\"; gene_name \"GENE2\"; gene_type \"lncRNA\";
chrM\tTEST\ttranscript\t1\t500\t.\t+\t.\tgene_id \"ENSG0003.1\"; gene_name \"MT-GENE\"; gene_type \"protein_coding\";
";

struct Workspace {
    dir: TempDir,
    gtf: PathBuf,
}

impl Workspace {
    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}

#[fixture]
fn workspace() -> Workspace {
    let dir = tempfile::tempdir().unwrap();
    let gtf = dir.path().join("annotation.gtf");
    fs::write(&gtf, GTF).unwrap();
    Workspace { dir, gtf }
}

fn gannot(cwd: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_gannot"))
        .current_dir(cwd)
        .args(args)
        .output()
        .unwrap()
}

fn stdout_lines(output: &Output) -> Vec<String> {
    assert!(
        output.status.success(),
        "gannot failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(|l| l.to_string())
        .collect()
}

#[rstest]
fn test_genes_command(workspace: Workspace) {
    let gtf = workspace.gtf.to_string_lossy().to_string();
    let output = gannot(
        workspace.dir.path(),
        &["--gtf", &gtf, "genes", "--genes", "GENE2,NOPE,GENE1,MT-GENE"],
    );
    let lines = stdout_lines(&output);

    assert_eq!(
        lines,
        vec![
            "Chromosome\tStart\tEnd\tStrand\tgene_name\tgene_id\tgene_type",
            "chr1\t1000\t1000\t+\tGENE1\tENSG0001\tprotein_coding",
            "chr1\t1500\t1500\t+\tGENE1\tENSG0001\tprotein_coding",
            "chr2\t5000\t5000\t-\tGENE2\tENSG0002\tlncRNA",
        ]
    );
}

#[rstest]
fn test_query_command_is_strict(workspace: Workspace) {
    let gtf = workspace.gtf.to_string_lossy().to_string();
    let output = gannot(
        workspace.dir.path(),
        &[
            "--gtf", &gtf, "query", "--chrom", "chr1", "--start", "1000", "--end", "2000",
        ],
    );
    let lines = stdout_lines(&output);
    assert_eq!(lines.len(), 2);
    assert!(lines[1].starts_with("chr1\t1500\t1500"));
}

#[rstest]
fn test_bodies_command(workspace: Workspace) {
    let gtf = workspace.gtf.to_string_lossy().to_string();
    let out = workspace.path("bodies.tsv");
    let output = gannot(
        workspace.dir.path(),
        &["--gtf", &gtf, "bodies", "--output", &out.to_string_lossy()],
    );
    assert!(output.status.success());

    let content = fs::read_to_string(out).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[1], "chr1\t1000\t1500\t+\tGENE1\tENSG0001\tprotein_coding");
}

#[rstest]
fn test_join_command(workspace: Workspace) {
    let gtf = workspace.gtf.to_string_lossy().to_string();
    let peaks = workspace.path("peaks.bed");
    fs::write(&peaks, "chr1\t1200\t1250\tp1\nchr3\t10\t20\tp2\n").unwrap();

    let output = gannot(
        workspace.dir.path(),
        &[
            "--gtf",
            &gtf,
            "join",
            "--peaks",
            &peaks.to_string_lossy(),
        ],
    );
    let lines = stdout_lines(&output);

    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("peak_chr\tpeak_start\tpeak_end\tpeak_field4\tChromosome"));
    assert!(lines[1].starts_with("chr1\t1200\t1250\tp1\tchr1\t700\t1300\t+\tGENE1"));
    assert!(lines[2].starts_with("chr1\t1200\t1250\tp1\tchr1\t1200\t1800\t+\tGENE1"));
    assert_eq!(lines[3], "chr3\t10\t20\tp2\t.\t-1\t-1\t.\t.\t.\t.");
}

fn write_bigwig(path: &Path, chrom_sizes: &[(&str, u32)], bedgraph: &str) {
    let bedgraph_path = path.with_extension("bedGraph");
    fs::write(&bedgraph_path, bedgraph).unwrap();

    let chrom_map: HashMap<String, u32> = chrom_sizes
        .iter()
        .map(|(chr, size)| (chr.to_string(), *size))
        .collect();
    let mut outb =
        BigWigWrite::create_file(path.to_string_lossy().into_owned(), chrom_map).unwrap();
    outb.options.input_sort_type = InputSortType::START;
    outb.options.channel_size = 0;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap();

    let allow_out_of_order_chroms = !matches!(outb.options.input_sort_type, InputSortType::ALL);
    let mut reader = BufReader::new(File::open(&bedgraph_path).unwrap());
    let vals = BedParserStreamingIterator::from_bedgraph_file(&mut reader, allow_out_of_order_chroms);
    outb.write(vals, runtime).unwrap();
}

#[rstest]
fn test_aggregate_command(workspace: Workspace) {
    let gtf = workspace.gtf.to_string_lossy().to_string();
    let bigwig = workspace.path("signal.bw");
    write_bigwig(
        &bigwig,
        &[("chr1", 3000), ("chr2", 6000)],
        "chr1\t990\t1010\t2.0\nchr2\t4990\t5000\t3.0\n",
    );
    let prefix = workspace.path("tss");

    let output = gannot(
        workspace.dir.path(),
        &[
            "--gtf",
            &gtf,
            "aggregate",
            "--genes",
            "GENE2,GENE1",
            "--bigwig",
            &bigwig.to_string_lossy(),
            "--output-prefix",
            &prefix.to_string_lossy(),
            "--threads",
            "2",
            "--upstream",
            "10",
            "--downstream",
            "10",
        ],
    );
    assert!(
        output.status.success(),
        "gannot failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let matrix: Array2<f64> = read_npy(workspace.path("tss.npy")).unwrap();
    assert_eq!(matrix.dim(), (2, 20));
    assert_eq!(matrix.row(0).to_vec(), vec![2.0; 20]);

    let mut gene2 = vec![3.0; 10];
    gene2.extend(vec![0.0; 10]);
    assert_eq!(matrix.row(1).to_vec(), gene2);

    let regions = fs::read_to_string(workspace.path("tss.regions.tsv")).unwrap();
    let spans: Vec<(String, String, String)> = regions
        .lines()
        .skip(1)
        .map(|line| {
            let cols: Vec<&str> = line.split('\t').collect();
            (cols[0].to_string(), cols[1].to_string(), cols[2].to_string())
        })
        .collect();
    assert_eq!(
        spans,
        vec![
            ("chr1".to_string(), "990".to_string(), "1010".to_string()),
            ("chr2".to_string(), "4990".to_string(), "5010".to_string()),
        ]
    );

    let tasks = fs::read_to_string(workspace.path("tss.tasks.tsv")).unwrap();
    assert_eq!(
        tasks.lines().collect::<Vec<_>>(),
        vec![
            "row\tChromosome\tregion_start\tregion_end",
            "0\tchr1\t0\t1",
            "1\tchr2\t1\t2",
        ]
    );
}

#[rstest]
fn test_gene_json_from_config(workspace: Workspace) {
    let config = workspace.path("gannot.toml");
    fs::write(
        &config,
        format!("gtf = {:?}\n", workspace.gtf.to_string_lossy()),
    )
    .unwrap();

    let output = gannot(workspace.dir.path(), &["gene", "GENE2", "--json"]);
    let text = stdout_lines(&output).join("\n");
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();

    assert_eq!(value["name"], "GENE2");
    assert_eq!(value["id"], "ENSG0002");
    assert_eq!(value["tss"][0]["position"], 5000);
}

#[rstest]
fn test_unknown_gene_fails(workspace: Workspace) {
    let gtf = workspace.gtf.to_string_lossy().to_string();
    let output = gannot(workspace.dir.path(), &["--gtf", &gtf, "gene", "NOPE"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("No such gene"));
}

#[rstest]
fn test_missing_annotation_fails(workspace: Workspace) {
    let output = gannot(workspace.dir.path(), &["bodies"]);
    assert!(!output.status.success());
}
