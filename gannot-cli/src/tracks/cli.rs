use clap::{Arg, Command, arg};

use crate::annotation::cli::gene_name_args;

pub const AGGREGATE_CMD: &str = "aggregate";

pub fn create_aggregate_cli() -> Command {
    gene_name_args(
        Command::new(AGGREGATE_CMD)
            .about("Read bigWig signal around the TSS of each gene and stack it into a matrix.")
            .arg(
                arg!(--bigwig <BIGWIG>)
                    .required(true)
                    .help("Path to the bigWig track"),
            )
            .arg(
                Arg::new("output-prefix")
                    .long("output-prefix")
                    .required(true)
                    .help("Prefix for the .npy matrix, .regions.tsv and .tasks.tsv outputs"),
            )
            .arg(
                arg!(--threads <THREADS>)
                    .required(false)
                    .help("Number of worker threads (default 96)"),
            )
            .arg(
                arg!(--upstream <UPSTREAM>)
                    .required(false)
                    .help("Bases upstream of each TSS (default 1000)"),
            )
            .arg(
                arg!(--downstream <DOWNSTREAM>)
                    .required(false)
                    .help("Bases downstream of each TSS (default 1000)"),
            )
            .arg(
                Arg::new("bin-size")
                    .long("bin-size")
                    .required(false)
                    .help("Average values over bins of this many bases"),
            ),
    )
}
