//! Conversion of SAM alignments into FASTQ entries.

use std::io;
use std::io::BufRead;
use std::io::Write;

use tracing::info;

use crate::reader;
use crate::reader::Reader;
use crate::record::alignment::Record;

/// An error related to a conversion.
#[derive(Debug)]
pub enum Error {
    /// A reader error.
    Reader(reader::Error),

    /// An error writing to the output.
    Write(io::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Reader(err) => write!(f, "reader error: {err}"),
            Error::Write(err) => write!(f, "write error: {err}"),
        }
    }
}

impl std::error::Error for Error {}

/// Decides which alignments are kept.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Filter {
    /// The reference sequence whose reads are dropped.
    ignore: Option<String>,
}

impl Filter {
    /// Creates a filter that drops every read aligned to `chromosome`.
    ///
    /// SAM uses `*` for unmapped reads, so `Filter::ignoring("*")` drops
    /// those.
    pub fn ignoring(chromosome: impl Into<String>) -> Self {
        Self {
            ignore: Some(chromosome.into()),
        }
    }

    /// Gets the ignored reference sequence, if any.
    pub fn ignore(&self) -> Option<&str> {
        self.ignore.as_deref()
    }

    /// Returns whether a record passes the filter.
    pub fn keep(&self, record: &Record) -> bool {
        match &self.ignore {
            Some(chromosome) => record.chromosome() != chromosome,
            None => true,
        }
    }
}

/// Counts from a finished conversion.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Summary {
    /// The number of FASTQ entries written.
    pub written: usize,

    /// The number of alignments removed by the filter.
    pub filtered: usize,
}

/// Writes every alignment in `reader` that passes `filter` as a FASTQ entry.
///
/// # Examples
///
/// ```
/// use tfmatrix::fastq;
/// use tfmatrix::fastq::Filter;
///
/// let data = b"@HD\tVN:1.6\n\
///              r1\t0\tchr1\t1\t60\t2M\t*\t0\t0\tAC\tII\n\
///              r2\t0\tchrM\t1\t60\t2M\t*\t0\t0\tGT\t##\n";
/// let mut reader = tfmatrix::Reader::new(&data[..]);
/// let mut output = Vec::new();
///
/// let summary = fastq::convert(&mut reader, &mut output, &Filter::ignoring("chrM"))?;
/// assert_eq!(summary.written, 1);
/// assert_eq!(summary.filtered, 1);
/// assert_eq!(String::from_utf8(output)?, "@r1\nAC\n+\nII\n");
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn convert<T, W>(
    reader: &mut Reader<T>,
    writer: &mut W,
    filter: &Filter,
) -> Result<Summary, Error>
where
    T: BufRead,
    W: Write,
{
    let mut summary = Summary::default();

    for result in reader.alignments() {
        let record = result.map_err(Error::Reader)?;

        if filter.keep(&record) {
            writeln!(writer, "{record}").map_err(Error::Write)?;
            summary.written += 1;
        } else {
            summary.filtered += 1;
        }
    }

    writer.flush().map_err(Error::Write)?;

    info!(
        "wrote {} reads, filtered {} reads",
        summary.written, summary.filtered
    );

    Ok(summary)
}
