use std::io::{BufRead, Write};
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use clap::ArgMatches;
use log::info;
use serde::Serialize;

use gannot_core::models::{IntervalTable, Strand};
use gannot_core::utils::{get_dynamic_reader, read_regions};
use gannot_genes::join::write_join_tsv;
use gannot_genes::{Gene, GenomicRange, Tss};

use crate::config::GannotConfig;
use crate::output::{open_output, write_json};

#[derive(Serialize)]
struct GeneSummary {
    name: String,
    id: String,
    chr: String,
    strand: Strand,
    tss: Vec<Tss>,
    genomic_range: GenomicRange,
}

impl GeneSummary {
    fn new(gene: &Gene, upstream: u32, downstream: u32) -> Self {
        GeneSummary {
            name: gene.name().to_string(),
            id: gene.id().to_string(),
            chr: gene.chr().to_string(),
            strand: gene.strand(),
            tss: gene.tss(),
            genomic_range: gene.genomic_range(upstream, downstream),
        }
    }
}

fn parse_arg<T: std::str::FromStr>(matches: &ArgMatches, name: &str) -> Result<T> {
    let value = matches
        .get_one::<String>(name)
        .ok_or_else(|| anyhow!("--{} is required", name))?;
    value
        .parse::<T>()
        .map_err(|_| anyhow!("Invalid value for --{}: {}", name, value))
}

///
/// Gene names from `--genes` and `--genes-file`, in the order given.
///
pub fn requested_gene_names(matches: &ArgMatches) -> Result<Option<Vec<String>>> {
    let mut names: Vec<String> = matches
        .get_many::<String>("genes")
        .map(|values| values.map(|v| v.trim().to_string()).collect())
        .unwrap_or_default();

    if let Some(path) = matches.get_one::<String>("genes-file") {
        let reader = get_dynamic_reader(Path::new(path))?;
        for line in reader.lines() {
            let line = line?;
            let line = line.trim();
            if !line.is_empty() && !line.starts_with('#') {
                names.push(line.to_string());
            }
        }
    }

    names.retain(|n| !n.is_empty());
    if names.is_empty() {
        return Ok(None);
    }
    Ok(Some(names))
}

fn write_table(table: &IntervalTable, matches: &ArgMatches) -> Result<()> {
    let mut writer = open_output(matches.get_one::<String>("output"))?;
    if matches.get_flag("json") {
        return write_json(table.rows(), &mut writer);
    }
    table.write_tsv(&mut writer)?;
    Ok(())
}

pub fn run_gene(matches: &ArgMatches) -> Result<()> {
    let config = GannotConfig::from_matches(matches)?;
    let index = config.load_index()?;

    let gene = match (
        matches.get_one::<String>("NAME"),
        matches.get_one::<String>("id-prefix"),
    ) {
        (_, Some(prefix)) => index.get_gene_by_id_prefix(prefix)?,
        (Some(name), None) => index.get_gene(name)?,
        (None, None) => return Err(anyhow!("Provide a gene name or --id-prefix")),
    };
    info!("{}", gene);

    let upstream: u32 = parse_arg(matches, "upstream")?;
    let downstream: u32 = parse_arg(matches, "downstream")?;

    if matches.get_flag("json") {
        let mut writer = open_output(matches.get_one::<String>("output"))?;
        return write_json(&GeneSummary::new(&gene, upstream, downstream), &mut writer);
    }

    info!(
        "Genomic range ({} up, {} down): {}",
        upstream,
        downstream,
        gene.genomic_range(upstream, downstream)
    );
    write_table(gene.tss_table(), matches)
}

pub fn run_genes(matches: &ArgMatches) -> Result<()> {
    let names = requested_gene_names(matches)?
        .ok_or_else(|| anyhow!("Provide gene names with --genes or --genes-file"))?;

    let config = GannotConfig::from_matches(matches)?;
    let index = config.load_index()?;

    let gene_set = index.get_genes(&names);
    info!("Found {} of {} requested genes", gene_set.len(), names.len());

    write_table(gene_set.tss_table(), matches)
}

pub fn run_bodies(matches: &ArgMatches) -> Result<()> {
    let names = requested_gene_names(matches)?;

    let config = GannotConfig::from_matches(matches)?;
    let index = config.load_index()?;

    let bodies = index.get_gene_bodies(names.as_deref());
    info!("{} gene bodies", bodies.len());

    write_table(&bodies, matches)
}

pub fn run_query(matches: &ArgMatches) -> Result<()> {
    let chrom = matches
        .get_one::<String>("chrom")
        .ok_or_else(|| anyhow!("--chrom is required"))?;
    let start: u32 = parse_arg(matches, "start")?;
    let end: u32 = parse_arg(matches, "end")?;
    let strand = matches
        .get_one::<String>("strand")
        .map(|s| s.parse::<Strand>())
        .transpose()?;

    let config = GannotConfig::from_matches(matches)?;
    let index = config.load_index()?;

    let rows = index.query_region(chrom, start, end, strand);
    info!("{} rows inside {}:{}-{}", rows.len(), chrom, start, end);

    write_table(&rows, matches)
}

pub fn run_join(matches: &ArgMatches) -> Result<()> {
    let peaks_path = matches
        .get_one::<String>("peaks")
        .ok_or_else(|| anyhow!("--peaks is required"))?;
    let extend: u32 = parse_arg(matches, "extend")?;

    let peaks = read_regions(peaks_path)
        .with_context(|| format!("Failed to read peaks from {}", peaks_path))?;

    let config = GannotConfig::from_matches(matches)?;
    let index = config.load_index()?;

    let joined = index.join_with_peaks(&peaks, extend);
    let matched = joined.iter().filter(|row| row.is_matched()).count();
    info!(
        "Joined {} peaks into {} rows ({} matched)",
        peaks.len(),
        joined.len(),
        matched
    );

    let mut writer = open_output(matches.get_one::<String>("output"))?;
    if matches.get_flag("json") {
        return write_json(&joined, &mut writer);
    }
    write_join_tsv(&joined, &mut writer)?;
    writer.flush()?;
    Ok(())
}
