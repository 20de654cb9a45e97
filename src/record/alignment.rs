//! A SAM alignment record, reduced to what a FASTQ entry needs.

use std::str::FromStr;

/// The delimiter for a SAM record.
pub const SAM_DELIMITER: char = '\t';

/// The number of mandatory fields in a SAM alignment line.
pub const NUM_MANDATORY_FIELDS: usize = 11;

/// The prefix of a SAM header line.
pub const SAM_HEADER_PREFIX: char = '@';

/// An error associated with parsing an alignment record.
#[derive(Debug)]
pub enum ParseError {
    /// An incorrect number of fields in the alignment line.
    IncorrectNumberOfFields(usize),
    /// The sequence and quality strings differ in length.
    QualityLengthMismatch(usize, usize),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::IncorrectNumberOfFields(n) => write!(
                f,
                "invalid number of fields in alignment: expected at least {} fields, found {} \
                 fields",
                NUM_MANDATORY_FIELDS, n
            ),
            ParseError::QualityLengthMismatch(seq, qual) => write!(
                f,
                "sequence length ({seq}) does not match quality length ({qual})"
            ),
        }
    }
}

impl std::error::Error for ParseError {}

/// An alignment line from a SAM file.
///
/// A record displays as a four-line FASTQ entry (without a trailing newline).
///
/// # Examples
///
/// ```
/// use tfmatrix::record::alignment::Record;
///
/// let record = "r1\t0\tchr1\t100\t60\t4M\t*\t0\t0\tACGT\tIIII".parse::<Record>()?;
/// assert_eq!(record.to_string(), "@r1\nACGT\n+\nIIII");
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Record {
    /// The read name (QNAME).
    name: String,

    /// The reference sequence name (RNAME).
    chromosome: String,

    /// The read sequence (SEQ).
    sequence: String,

    /// The base qualities (QUAL).
    quality: String,
}

impl Record {
    /// Gets the read name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Gets the reference sequence name the read aligned to.
    pub fn chromosome(&self) -> &str {
        &self.chromosome
    }

    /// Gets the read sequence.
    pub fn sequence(&self) -> &str {
        &self.sequence
    }

    /// Gets the base qualities.
    pub fn quality(&self) -> &str {
        &self.quality
    }
}

impl FromStr for Record {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = s.split(SAM_DELIMITER).collect::<Vec<_>>();
        if parts.len() < NUM_MANDATORY_FIELDS {
            return Err(ParseError::IncorrectNumberOfFields(parts.len()));
        }

        let sequence = parts[9];
        let quality = parts[10];

        // "*" marks an absent field in SAM.
        if sequence != "*" && quality != "*" && sequence.len() != quality.len() {
            return Err(ParseError::QualityLengthMismatch(
                sequence.len(),
                quality.len(),
            ));
        }

        Ok(Self {
            name: parts[0].into(),
            chromosome: parts[2].into(),
            sequence: sequence.into(),
            quality: quality.into(),
        })
    }
}

impl std::fmt::Display for Record {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "@{}\n{}\n+\n{}",
            self.name, self.sequence, self.quality
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parsing_alignment_record() -> Result<(), Box<dyn std::error::Error>> {
        let record = "read7\t16\tchrX\t5\t42\t3M\t=\t0\t0\tGGA\t#AB\tNM:i:0".parse::<Record>()?;
        assert_eq!(record.name(), "read7");
        assert_eq!(record.chromosome(), "chrX");
        assert_eq!(record.sequence(), "GGA");
        assert_eq!(record.quality(), "#AB");
        Ok(())
    }

    #[test]
    fn test_invalid_number_of_fields() {
        let err = "@HD\tVN:1.6".parse::<Record>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid number of fields in alignment: expected at least 11 fields, found 2 fields"
        );
    }

    #[test]
    fn test_quality_length_mismatch() {
        let err = "r1\t0\tchr1\t1\t60\t4M\t*\t0\t0\tACGT\tII"
            .parse::<Record>()
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "sequence length (4) does not match quality length (2)"
        );
    }

    #[test]
    fn test_missing_quality_is_allowed() -> Result<(), Box<dyn std::error::Error>> {
        let record = "r1\t4\t*\t0\t0\t*\t*\t0\t0\tACGT\t*".parse::<Record>()?;
        assert_eq!(record.chromosome(), "*");
        assert_eq!(record.to_string(), "@r1\nACGT\n+\n*");
        Ok(())
    }
}
