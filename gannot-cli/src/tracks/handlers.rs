use anyhow::{Context, Result, anyhow};
use clap::ArgMatches;
use log::info;

use gannot_tracks::{BigWigTrack, aggregate_tss_tracks};

use crate::annotation::handlers::requested_gene_names;
use crate::config::GannotConfig;

pub fn run_aggregate(matches: &ArgMatches) -> Result<()> {
    let bigwig = matches
        .get_one::<String>("bigwig")
        .ok_or_else(|| anyhow!("--bigwig is required"))?;
    let prefix = matches
        .get_one::<String>("output-prefix")
        .ok_or_else(|| anyhow!("--output-prefix is required"))?;
    let names = requested_gene_names(matches)?
        .ok_or_else(|| anyhow!("Provide gene names with --genes or --genes-file"))?;

    let config = GannotConfig::from_matches(matches)?;
    let index = config.load_index()?;
    let gene_set = index.get_genes(&names);

    let track = BigWigTrack::open(bigwig)?;
    let tracks = &config.tracks;

    let result = aggregate_tss_tracks(
        &gene_set,
        &track,
        tracks.upstream,
        tracks.downstream,
        tracks.threads,
        &tracks.options(),
    )?;

    let npy_path = format!("{}.npy", prefix);
    let regions_path = format!("{}.regions.tsv", prefix);
    let tasks_path = format!("{}.tasks.tsv", prefix);

    result
        .write_npy(&npy_path)
        .with_context(|| format!("Failed to write {}", npy_path))?;
    result.write_regions_tsv(&regions_path)?;
    result.write_tasks_tsv(&tasks_path)?;

    let (rows, cols) = result.matrix.dim();
    info!(
        "Wrote {} x {} matrix to {}, {} regions to {}",
        rows,
        cols,
        npy_path,
        result.regions.len(),
        regions_path
    );

    Ok(())
}
