use clap::{Arg, Command, arg};

pub const GENE_CMD: &str = "gene";
pub const GENES_CMD: &str = "genes";
pub const BODIES_CMD: &str = "bodies";
pub const QUERY_CMD: &str = "query";
pub const JOIN_CMD: &str = "join";

fn output_args(command: Command) -> Command {
    command
        .arg(
            arg!(--output <OUTPUT>)
                .required(false)
                .help("Output path (default: stdout)"),
        )
        .arg(
            arg!(--json)
                .action(clap::ArgAction::SetTrue)
                .help("Write JSON instead of TSV"),
        )
}

/// `--genes` (comma separated) and `--genes-file` (one name per line).
pub fn gene_name_args(command: Command) -> Command {
    command
        .arg(
            arg!(--genes <GENES>)
                .required(false)
                .value_delimiter(',')
                .help("Comma separated gene names"),
        )
        .arg(
            Arg::new("genes-file")
                .long("genes-file")
                .required(false)
                .help("File with one gene name per line"),
        )
}

pub fn create_gene_cli() -> Command {
    output_args(
        Command::new(GENE_CMD)
            .about("Show the TSS rows of a single gene.")
            .arg(
                arg!([NAME])
                    .required_unless_present("id-prefix")
                    .help("Gene name"),
            )
            .arg(
                Arg::new("id-prefix")
                    .long("id-prefix")
                    .required(false)
                    .conflicts_with("NAME")
                    .help("Look the gene up by gene id prefix instead of name"),
            )
            .arg(
                arg!(--upstream <UPSTREAM>)
                    .required(false)
                    .default_value("1048576")
                    .help("Bases upstream of the smallest TSS for the reported genomic range"),
            )
            .arg(
                arg!(--downstream <DOWNSTREAM>)
                    .required(false)
                    .default_value("1048576")
                    .help("Bases downstream of the smallest TSS for the reported genomic range"),
            ),
    )
}

pub fn create_genes_cli() -> Command {
    output_args(gene_name_args(
        Command::new(GENES_CMD).about("Collect the TSS rows of several genes. Unknown names are skipped."),
    ))
}

pub fn create_bodies_cli() -> Command {
    output_args(gene_name_args(Command::new(BODIES_CMD).about(
        "Protein-coding gene spans (chrM and chrY excluded), optionally restricted to some genes.",
    )))
}

pub fn create_query_cli() -> Command {
    output_args(
        Command::new(QUERY_CMD)
            .about("Rows strictly inside a region: Start > start and End < end.")
            .arg(arg!(--chrom <CHROM>).required(true).help("Chromosome"))
            .arg(arg!(--start <START>).required(true).help("Region start"))
            .arg(arg!(--end <END>).required(true).help("Region end"))
            .arg(
                arg!(--strand <STRAND>)
                    .required(false)
                    .help("Only keep rows on this strand (+ or -)"),
            ),
    )
}

pub fn create_join_cli() -> Command {
    output_args(
        Command::new(JOIN_CMD)
            .about("Left-join a BED file of peaks against TSS windows.")
            .arg(
                arg!(--peaks <PEAKS>)
                    .required(true)
                    .help("Path to a BED/BED.gz file of peaks"),
            )
            .arg(
                arg!(--extend <EXTEND>)
                    .required(false)
                    .default_value("300")
                    .help("Bases added to both sides of each TSS before joining"),
            ),
    )
}
