//! Per-accession motif counts read from one input file.

use std::collections::HashMap;
use std::io;
use std::io::BufRead;
use std::path::Path;
use std::path::PathBuf;

use tracing::info;

use crate::reader;
use crate::reader::Reader;
use crate::record::hit;

mod builder;

pub use builder::Builder;

/// An error related to loading a [`Dataset`].
#[derive(Debug)]
pub enum Error {
    /// The input file could not be opened.
    Open(PathBuf, io::Error),

    /// A reader error.
    Reader(reader::Error),

    /// A builder error.
    Builder(builder::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Open(path, err) => write!(f, "unable to open {}: {err}", path.display()),
            Error::Reader(err) => write!(f, "reader error: {err}"),
            Error::Builder(err) => write!(f, "builder error: {err}"),
        }
    }
}

impl std::error::Error for Error {}

/// A [`Result`](std::result::Result) with an [`Error`].
type Result<T> = std::result::Result<T, Error>;

/// The origin of a dataset, which doubles as its class label.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Class {
    /// The control dataset (label `0`).
    Control,

    /// The query dataset (label `1`).
    Query,
}

impl Class {
    /// Gets the value written to the target column for this class.
    ///
    /// # Examples
    ///
    /// ```
    /// use tfmatrix::dataset::Class;
    ///
    /// assert_eq!(Class::Control.target(), 0);
    /// assert_eq!(Class::Query.target(), 1);
    /// ```
    pub fn target(&self) -> u8 {
        match self {
            Class::Control => 0,
            Class::Query => 1,
        }
    }
}

impl std::fmt::Display for Class {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Class::Control => write!(f, "control"),
            Class::Query => write!(f, "query"),
        }
    }
}

/// Motif counts for every accession of one input file.
///
/// A [`Dataset`] cannot be changed once built. Use a [`Builder`] or one of
/// the loaders ([`read_tfsearch()`], [`read_fimo()`]) to create one.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Dataset {
    /// The class label.
    class: Class,

    /// The accessions in first-appearance order.
    accessions: Vec<String>,

    /// The row of each accession.
    index: HashMap<String, usize>,

    /// The motif counts, parallel to `accessions`.
    rows: Vec<HashMap<String, u64>>,

    /// The motifs in first-appearance order.
    motifs: Vec<String>,
}

impl Dataset {
    /// Gets the class of the dataset.
    pub fn class(&self) -> Class {
        self.class
    }

    /// Gets the number of accessions (rows) in the dataset.
    pub fn len(&self) -> usize {
        self.accessions.len()
    }

    /// Returns whether the dataset has no accessions.
    pub fn is_empty(&self) -> bool {
        self.accessions.is_empty()
    }

    /// Gets the accessions in the order they first appeared.
    pub fn accessions(&self) -> impl Iterator<Item = &str> {
        self.accessions.iter().map(|accession| accession.as_str())
    }

    /// Gets the motifs in the order they first appeared.
    pub fn motifs(&self) -> &[String] {
        &self.motifs
    }

    /// Gets the motif counts recorded for an accession.
    pub fn get(&self, accession: &str) -> Option<&HashMap<String, u64>> {
        self.index.get(accession).map(|row| &self.rows[*row])
    }

    /// Gets the count recorded for an (accession, motif) pair.
    ///
    /// # Examples
    ///
    /// ```
    /// use tfmatrix::dataset::Class;
    ///
    /// let data = b"A1 x PWM1 name, :: 5(0.1)\nA1 x PWM1 name, :: 2(0.1)";
    /// let mut reader = tfmatrix::Reader::new(&data[..]);
    /// let dataset = tfmatrix::dataset::read_tfsearch(&mut reader, Class::Control, &Default::default())?;
    ///
    /// assert_eq!(dataset.count("A1", "PWM1 name"), Some(2));
    /// assert_eq!(dataset.count("A1", "PWM2 other"), None);
    /// assert_eq!(dataset.count("B1", "PWM1 name"), None);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn count(&self, accession: &str, motif: &str) -> Option<u64> {
        self.get(accession)
            .and_then(|counts| counts.get(motif))
            .copied()
    }

    /// Gets an iterator over the accessions and their motif counts, in
    /// first-appearance order.
    pub fn rows(&self) -> impl Iterator<Item = (&str, &HashMap<String, u64>)> {
        self.accessions
            .iter()
            .zip(self.rows.iter())
            .map(|(accession, counts)| (accession.as_str(), counts))
    }
}

/// Reads a tfSearch output into a [`Dataset`].
///
/// Lines without the qualifier are skipped. When the same (accession, motif)
/// pair appears more than once, the last count wins. The first malformed hit
/// aborts the read.
///
/// # Examples
///
/// ```
/// use tfmatrix::dataset::Class;
/// use tfmatrix::record::hit::Config;
///
/// let data = b"# scan\nA1 x PWM1 name, :: 3(0.1)\nA1 x PWM1 name, :: 7(0.1)\nB1 x PWM2 other, :: 1(0.1)";
/// let mut reader = tfmatrix::Reader::new(&data[..]);
/// let dataset = tfmatrix::dataset::read_tfsearch(&mut reader, Class::Query, &Config::default())?;
///
/// assert_eq!(dataset.len(), 2);
/// assert_eq!(dataset.count("A1", "PWM1 name"), Some(7));
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn read_tfsearch<T>(
    reader: &mut Reader<T>,
    class: Class,
    config: &hit::Config,
) -> Result<Dataset>
where
    T: BufRead,
{
    let mut builder = Builder::default().class(class).map_err(Error::Builder)?;

    for result in reader.hits(config) {
        let (accession, motif, count) = result.map_err(Error::Reader)?.into_parts();
        builder = builder.insert(accession, motif, count);
    }

    let dataset = builder.try_build().map_err(Error::Builder)?;
    info!(
        "{} dataset: {} accessions, {} motifs from {} lines",
        class,
        dataset.len(),
        dataset.motifs().len(),
        reader.line_no()
    );

    Ok(dataset)
}

/// Reads a FIMO `--text` output into a [`Dataset`].
///
/// The first line is the column header. Every other line is one motif
/// occurrence and adds one to the (sequence, motif) count.
///
/// # Examples
///
/// ```
/// use tfmatrix::dataset::Class;
///
/// let data = b"motif_id\tsequence_name\nMA1\tseq1\nMA1\tseq1\nMA2\tseq2";
/// let mut reader = tfmatrix::Reader::new(&data[..]);
/// let dataset = tfmatrix::dataset::read_fimo(&mut reader, Class::Control)?;
///
/// assert_eq!(dataset.count("seq1", "MA1"), Some(2));
/// assert_eq!(dataset.count("seq2", "MA2"), Some(1));
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn read_fimo<T>(reader: &mut Reader<T>, class: Class) -> Result<Dataset>
where
    T: BufRead,
{
    let mut builder = Builder::default().class(class).map_err(Error::Builder)?;

    for result in reader.fimo_records() {
        let (sequence, motif) = result.map_err(Error::Reader)?.into_parts();
        builder = builder.increment(sequence, motif);
    }

    let dataset = builder.try_build().map_err(Error::Builder)?;
    info!(
        "{} dataset: {} sequences, {} motifs from {} lines",
        class,
        dataset.len(),
        dataset.motifs().len(),
        reader.line_no()
    );

    Ok(dataset)
}

/// Opens a tfSearch output file and reads it into a [`Dataset`].
pub fn open_tfsearch<P>(path: P, class: Class, config: &hit::Config) -> Result<Dataset>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let mut reader = reader::open(path).map_err(|e| Error::Open(path.to_path_buf(), e))?;
    read_tfsearch(&mut reader, class, config)
}

/// Opens a FIMO `--text` output file and reads it into a [`Dataset`].
pub fn open_fimo<P>(path: P, class: Class) -> Result<Dataset>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let mut reader = reader::open(path).map_err(|e| Error::Open(path.to_path_buf(), e))?;
    read_fimo(&mut reader, class)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_write_wins() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let data = b"A1 x PWM1 name, :: 3(0.1)\nA1 x PWM1 name, :: 7(0.1)\n";
        let mut reader = Reader::new(&data[..]);
        let dataset = read_tfsearch(&mut reader, Class::Control, &hit::Config::default())?;

        assert_eq!(dataset.count("A1", "PWM1 name"), Some(7));
        assert_eq!(dataset.len(), 1);
        Ok(())
    }

    #[test]
    fn test_skips_unqualified_lines() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let data = b"tfSearch v2\n\n# comment\nA1 x PWM1 name, :: 3(0.1)\nsummary: 1 hit\n";
        let mut reader = Reader::new(&data[..]);
        let dataset = read_tfsearch(&mut reader, Class::Query, &hit::Config::default())?;

        assert_eq!(dataset.class(), Class::Query);
        assert_eq!(dataset.accessions().collect::<Vec<_>>(), ["A1"]);
        assert_eq!(dataset.motifs(), ["PWM1 name"]);
        Ok(())
    }

    #[test]
    fn test_aborts_on_malformed_count() {
        let data = b"A1 x PWM1 name, :: 3(0.1)\nA2 x PWM1 name, :: n/a(0.1)\nA3 x PWM1 name, :: 1(0)\n";
        let mut reader = Reader::new(&data[..]);
        let err = read_tfsearch(&mut reader, Class::Control, &hit::Config::default()).unwrap_err();

        assert!(matches!(err, Error::Reader(reader::Error::Line(2, _))));
        assert_eq!(reader.line_no(), 2);
    }

    #[test]
    fn test_invalid_utf8_names_the_line() {
        let data = b"A1 x PWM1 name, :: 5(0.1)\nA2 x PWM1 \xff, :: 5(0.1)\n";
        let mut reader = Reader::new(&data[..]);
        let err = read_tfsearch(&mut reader, Class::Query, &hit::Config::default()).unwrap_err();

        assert_eq!(
            err.to_string(),
            "reader error: line 2: i/o error: stream did not contain valid UTF-8"
        );
    }

    #[test]
    fn test_fimo_accumulates_counts() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let data = b"#pattern name\tsequence name\tstart\n\
                     MA1\tchr1:1-10\t1\n\
                     MA2\tchr1:1-10\t4\n\
                     MA1\tchr1:1-10\t6\n\
                     MA2\tchr2:5-9\t2\n";
        let mut reader = Reader::new(&data[..]);
        let dataset = read_fimo(&mut reader, Class::Control)?;

        assert_eq!(dataset.accessions().collect::<Vec<_>>(), ["chr1:1-10", "chr2:5-9"]);
        assert_eq!(dataset.count("chr1:1-10", "MA1"), Some(2));
        assert_eq!(dataset.count("chr1:1-10", "MA2"), Some(1));
        assert_eq!(dataset.count("chr2:5-9", "MA1"), None);
        Ok(())
    }

    #[test]
    fn test_open_missing_file() {
        let err = open_tfsearch(
            "no/such/control.txt",
            Class::Control,
            &hit::Config::default(),
        )
        .unwrap_err();

        assert!(matches!(err, Error::Open(_, _)));
        assert!(err
            .to_string()
            .starts_with("unable to open no/such/control.txt: "));
    }
}
