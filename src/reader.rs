//! A line reader shared by all of the supported input formats.

use std::fs::File;
use std::io::BufRead;
use std::io::BufReader;
use std::io::{self};
use std::iter;
use std::path::Path;

use flate2::read::MultiGzDecoder;
use tracing::debug;

use crate::line;
use crate::line::Line;
use crate::record::alignment;
use crate::record::fimo;
use crate::record::hit;

/// The new line character.
const NEW_LINE: char = '\n';

/// The carriage return character.
const CARRIAGE_RETURN: char = '\r';

/// The extension marking a gzip-compressed input.
const GZIP_EXTENSION: &str = "gz";

/// The number of lines between progress events.
pub const PROGRESS_INTERVAL: usize = 50_000;

/// An error related to a [`Reader`].
#[derive(Debug)]
pub enum Error {
    /// An I/O error while reading the given line (e.g., the line is not
    /// valid UTF-8).
    Io(usize, io::Error),

    /// An invalid tfSearch line.
    Line(usize, line::ParseError),

    /// An invalid FIMO record.
    Fimo(usize, fimo::ParseError, String),

    /// An invalid SAM alignment record.
    Alignment(usize, alignment::ParseError, String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Io(line_no, err) => write!(f, "line {line_no}: i/o error: {err}"),
            Error::Line(line_no, err) => write!(f, "line {line_no}: {err}"),
            Error::Fimo(line_no, err, line) => {
                write!(f, "line {line_no}: invalid FIMO record: {err}\n\nline: {line}")
            }
            Error::Alignment(line_no, err, line) => {
                write!(
                    f,
                    "line {line_no}: invalid alignment record: {err}\n\nline: {line}"
                )
            }
        }
    }
}

impl std::error::Error for Error {}

/// A line reader.
#[derive(Clone, Debug)]
pub struct Reader<T>
where
    T: BufRead,
{
    /// The inner reader.
    inner: T,

    /// The number of lines read so far.
    line_no: usize,
}

impl<T> Reader<T>
where
    T: BufRead,
{
    /// Creates a reader.
    ///
    /// # Examples
    ///
    /// ```
    /// let data = b"A1 x PWM1 name, :: 5(0.1)\n";
    /// let reader = tfmatrix::Reader::new(&data[..]);
    /// ```
    pub fn new(inner: T) -> Self {
        Self::from(inner)
    }

    /// Gets a reference to the inner reader.
    pub fn inner(&self) -> &T {
        &self.inner
    }

    /// Gets a mutable reference to the inner reader.
    pub fn inner_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consumes self and returns the inner reader.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Gets the number of lines read so far (which is also the 1-based
    /// number of the most recently read line).
    pub fn line_no(&self) -> usize {
        self.line_no
    }

    /// Reads a raw, textual line from the underlying reader.
    ///
    /// A line that cannot be read does not advance [`Reader::line_no()`], so
    /// the failing line is `line_no() + 1`.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::io;
    ///
    /// let data = b"header\r\nA1 x PWM1 name, :: 5(0.1)";
    /// let mut reader = tfmatrix::Reader::new(&data[..]);
    ///
    /// let mut buffer = String::new();
    ///
    /// assert_eq!(reader.read_line_raw(&mut buffer)?, 8);
    /// assert_eq!(buffer, "header");
    ///
    /// assert_eq!(reader.read_line_raw(&mut buffer)?, 25);
    /// assert_eq!(buffer, "A1 x PWM1 name, :: 5(0.1)");
    ///
    /// assert_eq!(reader.read_line_raw(&mut buffer)?, 0);
    /// assert_eq!(reader.line_no(), 2);
    ///
    /// # Ok::<(), io::Error>(())
    /// ```
    pub fn read_line_raw(&mut self, buffer: &mut String) -> io::Result<usize> {
        let read = read_line(&mut self.inner, buffer)?;

        if read > 0 {
            self.line_no += 1;

            if self.line_no % PROGRESS_INTERVAL == 0 {
                debug!("read {} lines", self.line_no);
            }
        }

        Ok(read)
    }

    /// Attempts to read a tfSearch [`Line`] from the underlying reader.
    ///
    /// # Examples
    ///
    /// ```
    /// use tfmatrix::Line;
    /// use tfmatrix::record::hit::Config;
    ///
    /// let data = b"# tfSearch\nA1 x PWM1 name, :: 5(0.1)";
    /// let mut reader = tfmatrix::Reader::new(&data[..]);
    /// let config = Config::default();
    ///
    /// let mut buffer = String::new();
    /// assert!(matches!(reader.read_line(&mut buffer, &config)?, Some(Line::Ignored(_))));
    /// assert!(matches!(reader.read_line(&mut buffer, &config)?, Some(Line::Hit(_))));
    /// assert!(reader.read_line(&mut buffer, &config)?.is_none());
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn read_line(
        &mut self,
        buffer: &mut String,
        config: &hit::Config,
    ) -> Result<Option<Line>, Error> {
        match self
            .read_line_raw(buffer)
            .map_err(|e| Error::Io(self.line_no + 1, e))?
        {
            0 => Ok(None),
            _ => Line::parse(buffer, config)
                .map(Some)
                .map_err(|e| Error::Line(self.line_no, e)),
        }
    }

    /// Returns an iterator over the tfSearch hit records in the underlying
    /// reader. Lines without the qualifier are skipped.
    ///
    /// # Examples
    ///
    /// ```
    /// use tfmatrix::record::hit::Config;
    ///
    /// let data = b"# tfSearch\n\nA1 x PWM1 name, :: 5(0.1)\nA1 x PWM2 other, :: 1(0.1)";
    /// let mut reader = tfmatrix::Reader::new(&data[..]);
    /// let config = Config::default();
    ///
    /// let hits = reader.hits(&config).collect::<Result<Vec<_>, _>>()?;
    /// assert_eq!(hits.len(), 2);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn hits<'a>(
        &'a mut self,
        config: &'a hit::Config,
    ) -> impl Iterator<Item = Result<hit::Record, Error>> + 'a {
        let mut buffer = String::new();

        iter::from_fn(move || loop {
            match self.read_line(&mut buffer, config) {
                Ok(None) => return None,
                Ok(Some(Line::Hit(record))) => return Some(Ok(record)),
                Ok(Some(_)) => continue,
                Err(e) => return Some(Err(e)),
            }
        })
    }

    /// Returns an iterator over the FIMO `--text` records in the underlying
    /// reader. The first line is the column header and is skipped, as are
    /// blank lines.
    ///
    /// # Examples
    ///
    /// ```
    /// let data = b"motif_id\tsequence_name\tstart\nMA0004.1\tseq1\t3\nMA0006.1\tseq1\t9";
    /// let mut reader = tfmatrix::Reader::new(&data[..]);
    ///
    /// let records = reader.fimo_records().collect::<Result<Vec<_>, _>>()?;
    /// assert_eq!(records.len(), 2);
    /// assert_eq!(records[0].motif(), "MA0004.1");
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn fimo_records(&mut self) -> impl Iterator<Item = Result<fimo::Record, Error>> + '_ {
        let mut buffer = String::new();

        iter::from_fn(move || loop {
            match self.read_line_raw(&mut buffer) {
                Ok(0) => return None,
                Ok(_) if self.line_no == 1 || buffer.trim().is_empty() => continue,
                Ok(_) => {
                    return Some(
                        buffer
                            .parse::<fimo::Record>()
                            .map_err(|e| Error::Fimo(self.line_no, e, buffer.clone())),
                    )
                }
                Err(e) => return Some(Err(Error::Io(self.line_no + 1, e))),
            }
        })
    }

    /// Returns an iterator over the SAM alignment records in the underlying
    /// reader. Header lines and lines lacking the mandatory fields are
    /// skipped.
    ///
    /// # Examples
    ///
    /// ```
    /// let data = b"@HD\tVN:1.6\nr1\t0\tchr1\t1\t60\t2M\t*\t0\t0\tAC\tII\n";
    /// let mut reader = tfmatrix::Reader::new(&data[..]);
    ///
    /// let records = reader.alignments().collect::<Result<Vec<_>, _>>()?;
    /// assert_eq!(records.len(), 1);
    /// assert_eq!(records[0].name(), "r1");
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn alignments(&mut self) -> impl Iterator<Item = Result<alignment::Record, Error>> + '_ {
        let mut buffer = String::new();

        iter::from_fn(move || loop {
            match self.read_line_raw(&mut buffer) {
                Ok(0) => return None,
                Ok(_) if buffer.starts_with(alignment::SAM_HEADER_PREFIX) => continue,
                Ok(_) => match buffer.parse::<alignment::Record>() {
                    Ok(record) => return Some(Ok(record)),
                    Err(alignment::ParseError::IncorrectNumberOfFields(n)) => {
                        debug!("skipping line {} with {} fields", self.line_no, n);
                        continue;
                    }
                    Err(e) => return Some(Err(Error::Alignment(self.line_no, e, buffer.clone()))),
                },
                Err(e) => return Some(Err(Error::Io(self.line_no + 1, e))),
            }
        })
    }
}

impl<T> From<T> for Reader<T>
where
    T: BufRead,
{
    fn from(inner: T) -> Self {
        Self { inner, line_no: 0 }
    }
}

/// Opens a file for reading, transparently decompressing it when the path
/// ends in `.gz`.
pub fn open<P>(path: P) -> io::Result<Reader<Box<dyn BufRead>>>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)?;

    let inner: Box<dyn BufRead> = match path.extension().and_then(|ext| ext.to_str()) {
        Some(GZIP_EXTENSION) => Box::new(BufReader::new(MultiGzDecoder::new(file))),
        _ => Box::new(BufReader::new(file)),
    };

    Ok(Reader::new(inner))
}

/// Reads a line from a buffered reader, removing the line ending.
fn read_line<T>(reader: &mut T, buffer: &mut String) -> io::Result<usize>
where
    T: BufRead,
{
    buffer.clear();

    match reader.read_line(buffer) {
        Ok(0) => Ok(0),
        Ok(n) => {
            if buffer.ends_with(NEW_LINE) {
                buffer.pop();

                if buffer.ends_with(CARRIAGE_RETURN) {
                    buffer.pop();
                }
            }

            Ok(n)
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::io::Write as _;

    use flate2::write::GzEncoder;
    use flate2::Compression;

    use super::*;

    #[test]
    fn test_read_line() {
        let data = b"hello\r\nworld!";
        let mut cursor = io::Cursor::new(data);

        let mut buffer = String::new();
        let len = read_line(&mut cursor, &mut buffer).unwrap();
        assert_eq!(buffer, "hello");
        assert_eq!(len, 7);

        let len = read_line(&mut cursor, &mut buffer).unwrap();
        assert_eq!(buffer, "world!");
        assert_eq!(len, 6);
    }

    #[test]
    fn test_hit_error_reports_line_number() {
        let data = b"# header\nA1 x PWM1 name, :: 5(1)\nA2 x PWM1 name, :: x(1)\n";
        let mut reader = Reader::new(&data[..]);
        let config = hit::Config::default();

        let results = reader.hits(&config).collect::<Vec<_>>();
        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());

        let err = results.into_iter().nth(1).unwrap().unwrap_err();
        assert_eq!(
            err.to_string(),
            "line 3: invalid hit record: invalid count \"x\": invalid digit found in \
             string\n\nline: A2 x PWM1 name, :: x(1)"
        );
    }

    #[test]
    fn test_invalid_utf8_reports_line_number() {
        let data = b"A1 x PWM1 name, :: 5(0.1)\nA2 x PWM1 \xff, :: 5(0.1)\n";
        let mut reader = Reader::new(&data[..]);
        let config = hit::Config::default();

        let results = reader.hits(&config).collect::<Vec<_>>();
        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());

        let err = results.into_iter().nth(1).unwrap().unwrap_err();
        assert!(matches!(err, Error::Io(2, _)));
        assert_eq!(
            err.to_string(),
            "line 2: i/o error: stream did not contain valid UTF-8"
        );
    }

    #[test]
    fn test_fimo_invalid_utf8_reports_line_number() {
        let data = b"#pattern name\tsequence name\nMA1\tseq1\nMA\xfe\tseq2\n";
        let mut reader = Reader::new(&data[..]);

        let err = reader.fimo_records().find_map(Result::err).unwrap();
        assert!(matches!(err, Error::Io(3, _)));
    }

    #[test]
    fn test_fimo_skips_only_first_line() {
        let data = b"#pattern name\tsequence name\nMA1\tseq1\nMA2\n";
        let mut reader = Reader::new(&data[..]);

        let results = reader.fimo_records().collect::<Vec<_>>();
        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        assert!(matches!(results[1], Err(Error::Fimo(3, _, _))));
    }

    #[test]
    fn test_alignments_skip_short_lines() -> Result<(), Box<dyn std::error::Error>> {
        let data = b"@SQ\tSN:chr1\tLN:10\n\nshort\tline\nr1\t0\tchr1\t1\t60\t2M\t*\t0\t0\tAC\tII\n";
        let mut reader = Reader::new(&data[..]);

        let records = reader.alignments().collect::<Result<Vec<_>, _>>()?;
        assert_eq!(records.len(), 1);
        assert_eq!(reader.line_no(), 4);
        Ok(())
    }

    #[test]
    fn test_open_gzip() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir::TempDir::new("tfmatrix")?;
        let path = dir.path().join("hits.txt.gz");

        let mut encoder = GzEncoder::new(File::create(&path)?, Compression::default());
        encoder.write_all(b"A1 x PWM1 name, :: 5(0.1)\n")?;
        encoder.finish()?;

        let mut reader = open(&path)?;
        let config = hit::Config::default();
        let hits = reader.hits(&config).collect::<Result<Vec<_>, _>>()?;
        assert_eq!(hits, vec![hit::Record::new("A1", "PWM1 name", 5)]);
        Ok(())
    }

    #[test]
    fn test_open_missing_file() {
        let err = open("does/not/exist.txt").err().expect("expected an error");
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
