//! A FIMO `--text` hit record.

use std::str::FromStr;

/// The delimiter for a FIMO record.
pub const FIMO_DELIMITER: char = '\t';

/// The number of leading fields a FIMO record must carry.
pub const MIN_FIMO_FIELDS: usize = 2;

/// An error associated with parsing a FIMO record.
#[derive(Debug)]
pub enum ParseError {
    /// Too few fields to name a motif and a sequence.
    IncorrectNumberOfFields(usize),
    /// An empty motif identifier.
    EmptyMotif,
    /// An empty sequence name.
    EmptySequence,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::IncorrectNumberOfFields(n) => write!(
                f,
                "invalid number of fields in FIMO record: expected at least {} fields, found {} \
                 fields",
                MIN_FIMO_FIELDS, n
            ),
            ParseError::EmptyMotif => write!(f, "empty motif identifier"),
            ParseError::EmptySequence => write!(f, "empty sequence name"),
        }
    }
}

impl std::error::Error for ParseError {}

/// A single motif occurrence from FIMO's `--text` output.
///
/// Only the pattern and sequence columns are kept; each record counts as
/// one occurrence of the motif within the sequence.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Record {
    /// The motif (pattern) identifier.
    motif: String,

    /// The sequence name.
    sequence: String,
}

impl Record {
    /// Gets the motif identifier.
    pub fn motif(&self) -> &str {
        &self.motif
    }

    /// Gets the sequence name.
    pub fn sequence(&self) -> &str {
        &self.sequence
    }

    /// Consumes self and returns the sequence name and motif.
    pub fn into_parts(self) -> (String, String) {
        (self.sequence, self.motif)
    }
}

impl FromStr for Record {
    type Err = ParseError;

    /// Parses a FIMO record.
    ///
    /// # Examples
    ///
    /// ```
    /// use tfmatrix::record::fimo::Record;
    ///
    /// let record = "MA0004.1\tchr1:100-200\t3\t8\t+\t9.2\t1e-05\t\tCACGTG"
    ///     .parse::<Record>()?;
    /// assert_eq!(record.motif(), "MA0004.1");
    /// assert_eq!(record.sequence(), "chr1:100-200");
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = s.split(FIMO_DELIMITER).collect::<Vec<_>>();

        if parts.len() < MIN_FIMO_FIELDS {
            return Err(ParseError::IncorrectNumberOfFields(parts.len()));
        }

        let motif = parts[0].trim();
        if motif.is_empty() {
            return Err(ParseError::EmptyMotif);
        }

        let sequence = parts[1].trim();
        if sequence.is_empty() {
            return Err(ParseError::EmptySequence);
        }

        Ok(Self {
            motif: motif.into(),
            sequence: sequence.into(),
        })
    }
}
