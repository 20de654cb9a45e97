//! A line within a tfSearch output file.

use std::str::FromStr;

use crate::record::hit;
use crate::record::hit::Config;
use crate::record::hit::Record;

/// An error associated with parsing a tfSearch line.
#[derive(Debug)]
pub enum ParseError {
    /// A line carrying the qualifier that is not a valid hit record.
    InvalidHitRecord(hit::ParseError, String),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::InvalidHitRecord(err, line) => {
                write!(f, "invalid hit record: {}\n\nline: {}", err, line)
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// A line within a tfSearch output file.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Line {
    /// An empty line.
    Empty,
    /// A line without the qualifier (headers, comments, summaries).
    Ignored(String),
    /// A motif hit.
    Hit(Record),
}

impl Line {
    /// Classifies a line using the provided [`Config`].
    ///
    /// # Examples
    ///
    /// ```
    /// use tfmatrix::Line;
    /// use tfmatrix::record::hit::Config;
    ///
    /// let config = Config::default();
    /// assert_eq!(Line::parse("", &config)?, Line::Empty);
    /// assert!(matches!(Line::parse("# tfSearch", &config)?, Line::Ignored(_)));
    /// assert!(matches!(Line::parse("A1 x PWM1 name, :: 5(1)", &config)?, Line::Hit(_)));
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn parse(s: &str, config: &Config) -> Result<Self, ParseError> {
        if s.trim().is_empty() {
            Ok(Self::Empty)
        } else if config.is_hit(s) {
            Record::parse(s, config)
                .map(Line::Hit)
                .map_err(|e| ParseError::InvalidHitRecord(e, s.into()))
        } else {
            Ok(Self::Ignored(s.into()))
        }
    }
}

impl std::fmt::Display for Line {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Line::Empty => write!(f, ""),
            Line::Ignored(line) => write!(f, "{}", line),
            Line::Hit(record) => write!(f, "{}", record),
        }
    }
}

impl FromStr for Line {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s, &Config::default())
    }
}
