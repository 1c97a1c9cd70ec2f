use clap::{Arg, ArgAction, Command, arg};

pub const GEOMETRY_CMD: &str = "geometry";
pub const SIZES_CMD: &str = "sizes";
pub const GAPS_CMD: &str = "gaps";

pub fn create_geometry_cli() -> Command {
    Command::new(GEOMETRY_CMD)
        .about("Chromosome sizes and assembly gaps.")
        .subcommand_required(true)
        .subcommand(
            Command::new(SIZES_CMD)
                .about("Print chromosome lengths from a chrom sizes file.")
                .arg(
                    Arg::new("chrom-sizes")
                        .long("chrom-sizes")
                        .required(false)
                        .help("Path to a chrom<TAB>length file (default: config or <assembly>_chrom_sizes.txt)"),
                )
                .arg(
                    arg!(--chroms <CHROMS>)
                        .required(false)
                        .value_delimiter(',')
                        .help("Comma separated chromosomes to report"),
                )
                .arg(
                    arg!(--bed)
                        .action(ArgAction::SetTrue)
                        .help("Print whole-chromosome regions as BED, sorted by name"),
                ),
        )
        .subcommand(
            Command::new(GAPS_CMD)
                .about("Print telomere or heterochromatin gaps from an AGP file.")
                .arg(
                    arg!(--agp <AGP>)
                        .required(false)
                        .help("Path to an AGP file (default: config or <assembly>_agp.txt)"),
                )
                .arg(
                    arg!(--kind <KIND>)
                        .required(false)
                        .default_value("telomere")
                        .value_parser(["telomere", "heterochromatin"])
                        .help("Gap kind to report"),
                )
                .arg(
                    arg!(--tabix)
                        .action(ArgAction::SetTrue)
                        .help("Print a single space separated chr:start-end string"),
                ),
        )
}
