//! A tfSearch hit record.

use std::num::ParseIntError;
use std::str::FromStr;

/// The token that marks a line as a tfSearch hit.
pub const QUALIFIER: &str = "::";

/// The character that ends the count within a hit line.
pub const COUNT_TERMINATOR: char = '(';

/// The separator placed between the motif id and the motif name.
pub const MOTIF_SEPARATOR: char = ' ';

/// The minimum number of whitespace-delimited fields in a hit line.
pub const MIN_HIT_FIELDS: usize = 4;

/// An error associated with parsing a hit record.
#[derive(Debug)]
pub enum ParseError {
    /// The qualifier was not found in the line.
    MissingQualifier(String),
    /// Too few fields to name an accession and a motif.
    IncorrectNumberOfFields(usize),
    /// The count could not be parsed.
    InvalidCount(ParseIntError, String),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::MissingQualifier(qualifier) => {
                write!(f, "missing qualifier: expected \"{qualifier}\"")
            }
            ParseError::IncorrectNumberOfFields(n) => write!(
                f,
                "invalid number of fields in hit: expected at least {} fields, found {} fields",
                MIN_HIT_FIELDS, n
            ),
            ParseError::InvalidCount(err, value) => {
                write!(f, "invalid count \"{value}\": {err}")
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// The tokens used to recognize and take apart a hit line.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    /// The token that marks a line as a hit.
    qualifier: String,

    /// The character that ends the count.
    count_terminator: char,
}

impl Config {
    /// Creates a new hit configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use tfmatrix::record::hit::Config;
    ///
    /// let config = Config::new("=>", '[');
    /// assert_eq!(config.qualifier(), "=>");
    /// assert_eq!(config.count_terminator(), '[');
    /// ```
    pub fn new(qualifier: impl Into<String>, count_terminator: char) -> Self {
        Self {
            qualifier: qualifier.into(),
            count_terminator,
        }
    }

    /// Gets the qualifier.
    pub fn qualifier(&self) -> &str {
        &self.qualifier
    }

    /// Gets the count terminator.
    pub fn count_terminator(&self) -> char {
        self.count_terminator
    }

    /// Returns whether a line carries the qualifier.
    ///
    /// # Examples
    ///
    /// ```
    /// use tfmatrix::record::hit::Config;
    ///
    /// let config = Config::default();
    /// assert!(config.is_hit("A1 x PWM1 name, :: 5(0.1)"));
    /// assert!(!config.is_hit("# header"));
    /// ```
    pub fn is_hit(&self, line: &str) -> bool {
        line.contains(self.qualifier.as_str())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(QUALIFIER, COUNT_TERMINATOR)
    }
}

/// A single motif hit reported by tfSearch.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Record {
    /// The accession the motif was scanned against.
    accession: String,

    /// The motif identifier (id and name).
    motif: String,

    /// The number of occurrences.
    count: u64,
}

impl Record {
    /// Creates a new hit record.
    pub fn new(accession: impl Into<String>, motif: impl Into<String>, count: u64) -> Self {
        Self {
            accession: accession.into(),
            motif: motif.into(),
            count,
        }
    }

    /// Parses a hit record with the provided [`Config`].
    ///
    /// # Examples
    ///
    /// ```
    /// use tfmatrix::record::hit::Config;
    /// use tfmatrix::record::hit::Record;
    ///
    /// let record = Record::parse("A1 x PWM1 name, :: 5(0.12)", &Config::default())?;
    /// assert_eq!(record.accession(), "A1");
    /// assert_eq!(record.motif(), "PWM1 name");
    /// assert_eq!(record.count(), 5);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn parse(s: &str, config: &Config) -> Result<Self, ParseError> {
        let s = s.trim();

        let qualifier = config.qualifier();
        let start = s
            .rfind(qualifier)
            .ok_or_else(|| ParseError::MissingQualifier(qualifier.into()))?;

        let parts = s.split_whitespace().take(MIN_HIT_FIELDS).collect::<Vec<_>>();
        if parts.len() < MIN_HIT_FIELDS {
            return Err(ParseError::IncorrectNumberOfFields(parts.len()));
        }

        let count = parse_count(&s[start + qualifier.len()..], config.count_terminator())?;

        let mut motif = String::with_capacity(parts[2].len() + parts[3].len() + 1);
        motif.push_str(parts[2]);
        motif.push(MOTIF_SEPARATOR);
        motif.push_str(strip_trailing_punctuation(parts[3]));

        Ok(Self {
            accession: parts[0].into(),
            motif,
            count,
        })
    }

    /// Gets the accession.
    pub fn accession(&self) -> &str {
        &self.accession
    }

    /// Gets the motif identifier.
    pub fn motif(&self) -> &str {
        &self.motif
    }

    /// Gets the count.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Consumes self and returns the parts of the record.
    pub fn into_parts(self) -> (String, String, u64) {
        (self.accession, self.motif, self.count)
    }
}

impl FromStr for Record {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s, &Config::default())
    }
}

impl std::fmt::Display for Record {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}\t{}\t{}", self.accession, self.motif, self.count)
    }
}

/// Parses the count from the text following the qualifier.
fn parse_count(rest: &str, terminator: char) -> Result<u64, ParseError> {
    let value = match rest.find(terminator) {
        Some(end) => &rest[..end],
        None => rest,
    }
    .trim();

    value
        .parse()
        .map_err(|e| ParseError::InvalidCount(e, value.into()))
}

/// Removes the single trailing punctuation character (usually a comma) that
/// tfSearch places after the motif name.
fn strip_trailing_punctuation(name: &str) -> &str {
    match name.chars().last() {
        Some(c) if c.is_ascii_punctuation() => &name[..name.len() - 1],
        _ => name,
    }
}
