//! A binary that builds a sequence × motif count matrix from a control and a
//! query FIMO `--text` output.
//!
//! ```shell
//! cargo run --release --bin=fimo-matrix --features=binaries -- \
//!     --control control.fimo.txt --query query.fimo.txt --csv out.csv
//! ```
//!
//! Every FIMO line is one motif occurrence, so a cell holds the number of
//! times the motif was found in the sequence. Sequence names are written with
//! `:` and `-` replaced by `.` so that related control and query regions
//! share a common spelling.

use std::path::PathBuf;

use anyhow::Context;
use anyhow::Result;
use clap::Parser;
use clap_verbosity_flag::Verbosity;
use tfmatrix::dataset;
use tfmatrix::dataset::Class;
use tfmatrix::matrix;
use tfmatrix::Matrix;
use tfmatrix::Schema;
use tfmatrix::Sink;
use tracing::info;
use tracing_log::AsTrace as _;
use tracing_subscriber::EnvFilter;

/// The default output path.
const DEFAULT_OUTPUT: &str = "./out.csv";

/// The delimiter of the output table.
const CSV_DELIMITER: u8 = b',';

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Builds a motif count matrix from control and query FIMO --text outputs"
)]
struct Args {
    /// The FIMO `--text` output for the control sequences (Target = 0).
    #[arg(long, value_name = "FILE")]
    control: PathBuf,

    /// The FIMO `--text` output for the query sequences (Target = 1).
    #[arg(long, value_name = "FILE")]
    query: PathBuf,

    /// Where to write the matrix. Use `-` for standard output.
    #[arg(
        short = 'o',
        long,
        visible_alias = "output",
        value_name = "FILE",
        default_value = DEFAULT_OUTPUT
    )]
    csv: PathBuf,

    /// Keep sequence names exactly as FIMO reported them.
    #[arg(long, default_value_t = false)]
    keep_sequence_names: bool,

    #[command(flatten)]
    verbose: Verbosity,
}

fn run(args: &Args) -> Result<()> {
    info!("reading control hits from {}", args.control.display());
    let control = dataset::open_fimo(&args.control, Class::Control)
        .with_context(|| format!("reading control file `{}`", args.control.display()))?;

    info!("reading query hits from {}", args.query.display());
    let query = dataset::open_fimo(&args.query, Class::Query)
        .with_context(|| format!("reading query file `{}`", args.query.display()))?;

    let schema = Schema::from_datasets(&control, &query);
    info!("matrix schema: {} motifs", schema.len());

    let config = matrix::writer::Config::default()
        .with_delimiter(CSV_DELIMITER)
        .with_normalized_sequence_names(!args.keep_sequence_names);

    let sink = Sink::from_path(Some(&args.csv))
        .with_context(|| format!("creating `{}`", args.csv.display()))?;
    let mut writer = matrix::Writer::with_config(sink, config);

    let rows = writer
        .write_matrix(&Matrix::new(&control, &query, &schema))
        .context("writing matrix")?;
    writer
        .into_inner()
        .and_then(Sink::commit)
        .context("finishing output")?;

    info!("wrote {} rows to {}", rows, args.csv.display());

    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    match std::env::var("RUST_LOG") {
        Ok(_) => tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .init(),
        Err(_) => tracing_subscriber::fmt()
            .with_max_level(args.verbose.log_level_filter().as_trace())
            .with_writer(std::io::stderr)
            .init(),
    };

    run(&args)
}
