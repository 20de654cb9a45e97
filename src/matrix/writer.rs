//! A delimited-text writer for a [`Matrix`](crate::Matrix).
//!
//! Fields are written through [`csv`], so a sequence name or motif that
//! contains the delimiter, a quote, or a line break is quoted and every row
//! keeps the width of the header.

use std::borrow::Cow;
use std::io;
use std::io::Write;
use std::iter;
use std::sync::LazyLock;

use regex::Regex;

use crate::matrix::Matrix;
use crate::matrix::Row;
use crate::schema::Schema;

/// The name of the first column.
pub const SEQUENCE_COLUMN: &str = "Sequence";

/// The name of the last column.
pub const TARGET_COLUMN: &str = "Target";

/// The default field delimiter.
pub const DEFAULT_DELIMITER: u8 = b'\t';

/// The character that quotes fields in the output.
const QUOTE: u8 = b'"';

/// The character that replaces coordinate punctuation in sequence names.
pub const NAME_SEPARATOR: &str = ".";

/// Coordinate punctuation that is replaced when normalizing sequence names
/// (e.g., `chr1:111-553` becomes `chr1.111.553`).
static COORDINATE_PUNCTUATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[:\-]").expect("pattern to compile"));

/// An error associated with parsing a field delimiter.
#[derive(Debug, Eq, PartialEq)]
pub enum ParseDelimiterError {
    /// The value was not exactly one character.
    InvalidLength(String),

    /// The delimiter is not an ASCII character.
    NonAscii(char),

    /// The delimiter is whitespace other than a tab.
    ///
    /// Motif names contain spaces and sequence names end at line breaks, so
    /// either would make the header ambiguous.
    Whitespace(char),

    /// The delimiter is the quote character.
    Quote,
}

impl std::fmt::Display for ParseDelimiterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseDelimiterError::InvalidLength(value) => {
                write!(f, "expected a single character, found \"{value}\"")
            }
            ParseDelimiterError::NonAscii(c) => write!(f, "non-ASCII delimiter {c:?}"),
            ParseDelimiterError::Whitespace(c) => {
                write!(f, "whitespace delimiter {c:?} (only a tab is allowed)")
            }
            ParseDelimiterError::Quote => write!(f, "the quote character cannot be a delimiter"),
        }
    }
}

impl std::error::Error for ParseDelimiterError {}

/// Parses a field delimiter. A literal tab or the escape `\t` selects a tab.
///
/// # Examples
///
/// ```
/// use tfmatrix::matrix::writer::parse_delimiter;
///
/// assert_eq!(parse_delimiter(",")?, b',');
/// assert_eq!(parse_delimiter("\\t")?, b'\t');
/// assert!(parse_delimiter(" ").is_err());
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn parse_delimiter(s: &str) -> Result<u8, ParseDelimiterError> {
    if s == "\\t" {
        return Ok(b'\t');
    }

    let mut chars = s.chars();

    let c = match (chars.next(), chars.next()) {
        (Some(c), None) => c,
        _ => return Err(ParseDelimiterError::InvalidLength(s.into())),
    };

    if !c.is_ascii() {
        return Err(ParseDelimiterError::NonAscii(c));
    }

    if c.is_ascii_whitespace() && c != '\t' {
        return Err(ParseDelimiterError::Whitespace(c));
    }

    if c as u8 == QUOTE {
        return Err(ParseDelimiterError::Quote);
    }

    Ok(c as u8)
}

/// How a [`Matrix`] is laid out as text.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    /// The field delimiter.
    delimiter: u8,

    /// Whether sequence names are normalized before writing.
    normalize_sequence_names: bool,
}

impl Config {
    /// Sets the field delimiter.
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Sets whether `:` and `-` in sequence names are replaced with `.`.
    pub fn with_normalized_sequence_names(mut self, normalize: bool) -> Self {
        self.normalize_sequence_names = normalize;
        self
    }

    /// Gets the field delimiter.
    pub fn delimiter(&self) -> u8 {
        self.delimiter
    }

    /// Gets whether sequence names are normalized.
    pub fn normalize_sequence_names(&self) -> bool {
        self.normalize_sequence_names
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER,
            normalize_sequence_names: false,
        }
    }
}

/// A matrix writer.
#[derive(Debug)]
pub struct Writer<W>
where
    W: Write,
{
    /// The inner record writer.
    inner: csv::Writer<W>,

    /// Whether sequence names are normalized before writing.
    normalize_sequence_names: bool,
}

impl<W> Writer<W>
where
    W: Write,
{
    /// Creates a matrix writer with the default (tab-delimited) layout.
    pub fn new(inner: W) -> Self {
        Self::with_config(inner, Config::default())
    }

    /// Creates a matrix writer with the provided layout.
    pub fn with_config(inner: W, config: Config) -> Self {
        let inner = csv::WriterBuilder::new()
            .delimiter(config.delimiter)
            .quote(QUOTE)
            .from_writer(inner);

        Self {
            inner,
            normalize_sequence_names: config.normalize_sequence_names,
        }
    }

    /// Gets a reference to the inner writer.
    pub fn inner(&self) -> &W {
        self.inner.get_ref()
    }

    /// Flushes any buffered fields and returns the inner writer.
    pub fn into_inner(self) -> io::Result<W> {
        self.inner.into_inner().map_err(|e| e.into_error())
    }

    /// Writes the header line: `Sequence`, each motif, `Target`.
    pub fn write_header(&mut self, schema: &Schema) -> io::Result<()> {
        let fields = iter::once(SEQUENCE_COLUMN)
            .chain(schema.iter())
            .chain(iter::once(TARGET_COLUMN));

        self.inner.write_record(fields)?;
        Ok(())
    }

    /// Writes a single row.
    pub fn write_row(&mut self, row: &Row<'_>) -> io::Result<()> {
        let sequence = if self.normalize_sequence_names {
            normalize_sequence_name(row.sequence())
        } else {
            Cow::Borrowed(row.sequence())
        };

        let fields = iter::once(sequence.into_owned())
            .chain(row.counts().iter().map(|count| count.to_string()))
            .chain(iter::once(row.target().to_string()));

        self.inner.write_record(fields)?;
        Ok(())
    }

    /// Writes the header followed by every row and flushes the inner writer.
    /// Returns the number of rows written.
    ///
    /// # Examples
    ///
    /// ```
    /// use tfmatrix::dataset::Builder;
    /// use tfmatrix::dataset::Class;
    /// use tfmatrix::matrix::Writer;
    /// use tfmatrix::Matrix;
    /// use tfmatrix::Schema;
    ///
    /// let control = Builder::default()
    ///     .class(Class::Control)?
    ///     .insert("A1", "PWM1 name", 5)
    ///     .try_build()?;
    /// let query = Builder::default()
    ///     .class(Class::Query)?
    ///     .insert("B1", "PWM2 other", 2)
    ///     .try_build()?;
    /// let schema = Schema::from_datasets(&control, &query);
    ///
    /// let mut writer = Writer::new(Vec::new());
    /// writer.write_matrix(&Matrix::new(&control, &query, &schema))?;
    ///
    /// assert_eq!(
    ///     String::from_utf8(writer.into_inner()?)?,
    ///     "Sequence\tPWM1 name\tPWM2 other\tTarget\nA1\t5\t0\t0\nB1\t0\t2\t1\n"
    /// );
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn write_matrix(&mut self, matrix: &Matrix<'_>) -> io::Result<usize> {
        self.write_header(matrix.schema())?;

        let mut n = 0;
        for row in matrix.rows() {
            self.write_row(&row)?;
            n += 1;
        }

        self.inner.flush()?;
        Ok(n)
    }
}

/// Replaces `:` and `-` in a sequence name with `.`.
///
/// # Examples
///
/// ```
/// use tfmatrix::matrix::writer::normalize_sequence_name;
///
/// assert_eq!(normalize_sequence_name("match.chr1:111-553"), "match.chr1.111.553");
/// assert_eq!(normalize_sequence_name("seq1"), "seq1");
/// ```
pub fn normalize_sequence_name(name: &str) -> Cow<'_, str> {
    COORDINATE_PUNCTUATION.replace_all(name, NAME_SEPARATOR)
}
