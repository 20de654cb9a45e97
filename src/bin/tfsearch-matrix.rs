//! A binary that builds a sequence × motif count matrix from a control and a
//! query tfSearch output.
//!
//! ```shell
//! cargo run --release --bin=tfsearch-matrix --features=binaries -- \
//!     --control control.txt --query query.txt -o matrix.tsv
//! ```
//!
//! Both inputs are read completely before anything is written, so a
//! malformed hit line aborts the run without producing any rows.

use std::path::PathBuf;

use anyhow::Context;
use anyhow::Result;
use clap::Parser;
use clap_verbosity_flag::Verbosity;
use tfmatrix::dataset;
use tfmatrix::dataset::Class;
use tfmatrix::matrix;
use tfmatrix::record::hit;
use tfmatrix::Matrix;
use tfmatrix::Schema;
use tfmatrix::Sink;
use tracing::info;
use tracing_log::AsTrace as _;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Builds a motif count matrix from control and query tfSearch outputs"
)]
struct Args {
    /// The tfSearch output for the control sequences (Target = 0).
    #[arg(long, value_name = "FILE")]
    control: PathBuf,

    /// The tfSearch output for the query sequences (Target = 1).
    #[arg(long, value_name = "FILE")]
    query: PathBuf,

    /// Where to write the matrix. Omit or use `-` for standard output.
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// The token that marks a line as a motif hit.
    #[arg(long, default_value = hit::QUALIFIER)]
    qualifier: String,

    /// The field delimiter of the matrix (`\t` for a tab). Motif names
    /// contain spaces, so no other whitespace is accepted.
    #[arg(short, long, default_value = "\\t", value_parser = matrix::writer::parse_delimiter)]
    delimiter: u8,

    #[command(flatten)]
    verbose: Verbosity,
}

fn run(args: &Args) -> Result<()> {
    let config = hit::Config::new(args.qualifier.as_str(), hit::COUNT_TERMINATOR);

    info!("reading control hits from {}", args.control.display());
    let control = dataset::open_tfsearch(&args.control, Class::Control, &config)
        .with_context(|| format!("reading control file `{}`", args.control.display()))?;

    info!("reading query hits from {}", args.query.display());
    let query = dataset::open_tfsearch(&args.query, Class::Query, &config)
        .with_context(|| format!("reading query file `{}`", args.query.display()))?;

    let schema = Schema::from_datasets(&control, &query);
    info!("matrix schema: {} motifs", schema.len());

    let sink = Sink::from_path(args.output.as_ref()).context("opening output")?;
    let mut writer = matrix::Writer::with_config(
        sink,
        matrix::writer::Config::default().with_delimiter(args.delimiter),
    );

    let rows = writer
        .write_matrix(&Matrix::new(&control, &query, &schema))
        .context("writing matrix")?;
    writer
        .into_inner()
        .and_then(Sink::commit)
        .context("finishing output")?;

    info!("wrote {} rows", rows);

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
