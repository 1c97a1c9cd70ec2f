use std::io::Write;
use std::path::PathBuf;

use anyhow::{Result, anyhow};
use clap::ArgMatches;

use gannot_genes::{ChromGaps, ChromSizes};

use crate::config::GannotConfig;
use crate::output::open_output;

fn resolve_path(
    explicit: Option<&String>,
    configured: Option<PathBuf>,
    from_release: Option<PathBuf>,
    what: &str,
) -> Result<PathBuf> {
    explicit
        .map(PathBuf::from)
        .or(configured)
        .or(from_release)
        .ok_or_else(|| anyhow!("No {} file given", what))
}

pub fn run_sizes(matches: &ArgMatches) -> Result<()> {
    let config = GannotConfig::from_matches(matches)?;
    let path = resolve_path(
        matches.get_one::<String>("chrom-sizes"),
        config.chrom_sizes.clone(),
        config.gencode_release().map(|r| r.chrom_sizes_path()),
        "chrom sizes",
    )?;
    let sizes = ChromSizes::from_file(&path)?;

    let mut writer = open_output(None)?;

    if matches.get_flag("bed") {
        for region in sizes.as_regions() {
            writeln!(writer, "{}", region.as_string())?;
        }
    } else if let Some(chroms) = matches.get_many::<String>("chroms") {
        let chroms: Vec<&String> = chroms.collect();
        for (chr, size) in sizes.subset(&chroms) {
            match size {
                Some(size) => writeln!(writer, "{}\t{}", chr, size)?,
                None => writeln!(writer, "{}\tNA", chr)?,
            }
        }
    } else {
        for (chr, size) in sizes.iter() {
            writeln!(writer, "{}\t{}", chr, size)?;
        }
    }

    writer.flush()?;
    Ok(())
}

pub fn run_gaps(matches: &ArgMatches) -> Result<()> {
    let config = GannotConfig::from_matches(matches)?;
    let path = resolve_path(
        matches.get_one::<String>("agp"),
        config.agp.clone(),
        config.gencode_release().map(|r| r.agp_path()),
        "AGP",
    )?;
    let gaps = ChromGaps::from_file(&path)?;

    let records = match matches.get_one::<String>("kind").map(String::as_str) {
        Some("heterochromatin") => gaps.heterochromatin(),
        _ => gaps.telomeres(),
    };

    let mut writer = open_output(None)?;
    if matches.get_flag("tabix") {
        writeln!(writer, "{}", ChromGaps::to_tabix(&records))?;
    } else {
        for record in records {
            writeln!(
                writer,
                "{}\t{}\t{}\t{}",
                record.chr, record.start, record.end, record.component_start
            )?;
        }
    }

    writer.flush()?;
    Ok(())
}
