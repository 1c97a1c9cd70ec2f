mod annotation;
mod config;
mod geometry;
mod output;
mod tracks;

use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command, arg};
use log::Level;
use simple_logger::init_with_level;

pub mod consts {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    pub const BIN_NAME: &str = "gannot";
}

fn build_parser() -> Command {
    Command::new(consts::BIN_NAME)
        .bin_name(consts::BIN_NAME)
        .version(consts::VERSION)
        .author("Databio")
        .about("Gene annotation lookups, peak joins and TSS-anchored track aggregation.")
        .subcommand_required(true)
        .arg(
            arg!(--config <CONFIG>)
                .required(false)
                .global(true)
                .help("Path to a gannot.toml config file"),
        )
        .arg(
            arg!(-v --verbose)
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Log debug messages"),
        )
        .arg(
            arg!(--gtf <GTF>)
                .required(false)
                .global(true)
                .help("Path to a GTF/GTF.gz annotation"),
        )
        .arg(
            arg!(--assembly <ASSEMBLY>)
                .required(false)
                .global(true)
                .help("Genome assembly of a GENCODE release: hg38, hg19 or mm10"),
        )
        .arg(
            Arg::new("gencode-version")
                .long("gencode-version")
                .required(false)
                .global(true)
                .help("GENCODE release version, e.g. 44 or M25"),
        )
        .arg(
            Arg::new("annotation-dir")
                .long("annotation-dir")
                .required(false)
                .global(true)
                .help("Directory holding GENCODE annotation files"),
        )
        .arg(
            Arg::new("exclude")
                .long("exclude")
                .action(ArgAction::Append)
                .global(true)
                .help("Chromosome to drop while loading (repeatable; default chrM and chrY)"),
        )
        .subcommand(annotation::cli::create_gene_cli())
        .subcommand(annotation::cli::create_genes_cli())
        .subcommand(annotation::cli::create_bodies_cli())
        .subcommand(annotation::cli::create_query_cli())
        .subcommand(annotation::cli::create_join_cli())
        .subcommand(tracks::cli::create_aggregate_cli())
        .subcommand(geometry::cli::create_geometry_cli())
}

fn init_logging(matches: &ArgMatches) -> Result<()> {
    let level = match matches.get_flag("verbose") {
        true => Level::Debug,
        false => Level::Info,
    };
    init_with_level(level)?;
    Ok(())
}

fn main() -> Result<()> {
    let app = build_parser();
    let matches = app.get_matches();

    init_logging(&matches)?;

    match matches.subcommand() {
        //
        // ANNOTATION QUERIES
        //
        Some((annotation::cli::GENE_CMD, matches)) => {
            annotation::handlers::run_gene(matches)?;
        }
        Some((annotation::cli::GENES_CMD, matches)) => {
            annotation::handlers::run_genes(matches)?;
        }
        Some((annotation::cli::BODIES_CMD, matches)) => {
            annotation::handlers::run_bodies(matches)?;
        }
        Some((annotation::cli::QUERY_CMD, matches)) => {
            annotation::handlers::run_query(matches)?;
        }
        Some((annotation::cli::JOIN_CMD, matches)) => {
            annotation::handlers::run_join(matches)?;
        }

        //
        // TRACK AGGREGATION
        //
        Some((tracks::cli::AGGREGATE_CMD, matches)) => {
            tracks::handlers::run_aggregate(matches)?;
        }

        //
        // CHROMOSOME GEOMETRY
        //
        Some((geometry::cli::GEOMETRY_CMD, matches)) => match matches.subcommand() {
            Some((geometry::cli::SIZES_CMD, matches)) => {
                geometry::handlers::run_sizes(matches)?;
            }
            Some((geometry::cli::GAPS_CMD, matches)) => {
                geometry::handlers::run_gaps(matches)?;
            }
            _ => unreachable!("Geometry subcommand not found"),
        },

        _ => unreachable!("Subcommand not found"),
    };

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parser_is_valid() {
        build_parser().debug_assert();
    }
}
