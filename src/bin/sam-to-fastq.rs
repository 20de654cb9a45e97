//! A binary that converts SAM alignments into FASTQ reads, optionally
//! dropping the reads aligned to one reference sequence.
//!
//! ```shell
//! cargo run --release --bin=sam-to-fastq --features=binaries -- \
//!     --input aligned.sam --ignore '*' -o mapped.fastq
//! ```

use std::path::PathBuf;

use anyhow::Context;
use anyhow::Result;
use clap::Parser;
use clap_verbosity_flag::Verbosity;
use tfmatrix::fastq;
use tfmatrix::fastq::Filter;
use tfmatrix::reader;
use tfmatrix::Sink;
use tracing::info;
use tracing_log::AsTrace as _;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(author, version, about = "Converts a SAM file into FASTQ reads")]
struct Args {
    /// The SAM file to convert.
    #[arg(short, long = "input", visible_alias = "in", value_name = "FILE")]
    input: PathBuf,

    /// Drop reads aligned to this reference sequence (`*` drops unmapped
    /// reads).
    #[arg(long, value_name = "CHROM")]
    ignore: Option<String>,

    /// Where to write the reads. Omit or use `-` for standard output.
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    #[command(flatten)]
    verbose: Verbosity,
}

fn run(args: &Args) -> Result<()> {
    let filter = match &args.ignore {
        Some(chromosome) if !chromosome.is_empty() => Filter::ignoring(chromosome.as_str()),
        _ => Filter::default(),
    };

    let mut reader = reader::open(&args.input)
        .with_context(|| format!("opening SAM file `{}`", args.input.display()))?;
    let mut sink = Sink::from_path(args.output.as_ref()).context("opening output")?;

    let summary = fastq::convert(&mut reader, &mut sink, &filter)
        .with_context(|| format!("converting `{}`", args.input.display()))?;
    sink.commit().context("finishing output")?;

    info!(
        "converted {} reads ({} filtered)",
        summary.written, summary.filtered
    );

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
