//! A builder for a dataset.

use std::collections::HashMap;
use std::collections::HashSet;

use crate::dataset::Class;
use crate::dataset::Dataset;

/// An error that occurs when a required field was never provided to the
/// [`Builder`].
#[derive(Debug)]
pub enum MissingError {
    /// No class was provided to the [`Builder`].
    Class,
}

impl std::fmt::Display for MissingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MissingError::Class => write!(f, "class"),
        }
    }
}

impl std::error::Error for MissingError {}

/// An error that occurs when a singular field was provided multiple times to
/// the [`Builder`].
#[derive(Debug)]
pub enum MultipleError {
    /// The class field was provided multiple times to the [`Builder`].
    Class,
}

impl std::fmt::Display for MultipleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MultipleError::Class => write!(f, "class"),
        }
    }
}

impl std::error::Error for MultipleError {}

/// An error related to a [`Builder`].
#[derive(Debug)]
pub enum Error {
    /// An error where a required field was never provided to the [`Builder`].
    Missing(MissingError),

    /// An error where a singular field was provided to the [`Builder`] more
    /// than once.
    Multiple(MultipleError),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Missing(err) => write!(f, "missing required field: {err}"),
            Error::Multiple(err) => write!(f, "singular field set multiple times: {err}"),
        }
    }
}

impl std::error::Error for Error {}

/// A [`Result`](std::result::Result) with an [`Error`].
type Result<T> = std::result::Result<T, Error>;

/// A builder for a [`Dataset`].
///
/// Accessions and motifs are remembered in the order they are first seen.
#[derive(Debug, Default)]
pub struct Builder {
    /// The class label.
    class: Option<Class>,

    /// The accessions in first-appearance order.
    accessions: Vec<String>,

    /// The row of each accession.
    index: HashMap<String, usize>,

    /// The motif counts, parallel to `accessions`.
    rows: Vec<HashMap<String, u64>>,

    /// The motifs in first-appearance order.
    motifs: Vec<String>,

    /// The motifs seen so far.
    seen_motifs: HashSet<String>,
}

impl Builder {
    /// Sets the class for the [`Builder`].
    ///
    /// # Examples
    ///
    /// ```
    /// use tfmatrix::dataset::Builder;
    /// use tfmatrix::dataset::Class;
    ///
    /// let builder = Builder::default().class(Class::Control)?;
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn class(mut self, class: Class) -> Result<Self> {
        if self.class.is_some() {
            return Err(Error::Multiple(MultipleError::Class));
        }

        self.class = Some(class);
        Ok(self)
    }

    /// Sets the count for an (accession, motif) pair, replacing any count
    /// recorded earlier for the same pair.
    ///
    /// # Examples
    ///
    /// ```
    /// use tfmatrix::dataset::Builder;
    /// use tfmatrix::dataset::Class;
    ///
    /// let dataset = Builder::default()
    ///     .class(Class::Query)?
    ///     .insert("A1", "PWM1 name", 3)
    ///     .insert("A1", "PWM1 name", 7)
    ///     .try_build()?;
    ///
    /// assert_eq!(dataset.count("A1", "PWM1 name"), Some(7));
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn insert(
        mut self,
        accession: impl Into<String>,
        motif: impl Into<String>,
        count: u64,
    ) -> Self {
        *self.entry(accession.into(), motif.into()) = count;
        self
    }

    /// Adds one to the count for an (accession, motif) pair.
    ///
    /// # Examples
    ///
    /// ```
    /// use tfmatrix::dataset::Builder;
    /// use tfmatrix::dataset::Class;
    ///
    /// let dataset = Builder::default()
    ///     .class(Class::Control)?
    ///     .increment("seq1", "MA0004.1")
    ///     .increment("seq1", "MA0004.1")
    ///     .try_build()?;
    ///
    /// assert_eq!(dataset.count("seq1", "MA0004.1"), Some(2));
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn increment(mut self, accession: impl Into<String>, motif: impl Into<String>) -> Self {
        *self.entry(accession.into(), motif.into()) += 1;
        self
    }

    /// Consumes `self` to attempt to build a [`Dataset`].
    pub fn try_build(self) -> Result<Dataset> {
        let class = self.class.ok_or(Error::Missing(MissingError::Class))?;

        Ok(Dataset {
            class,
            accessions: self.accessions,
            index: self.index,
            rows: self.rows,
            motifs: self.motifs,
        })
    }

    /// Gets the count slot for an (accession, motif) pair, registering either
    /// key if it has not been seen before.
    fn entry(&mut self, accession: String, motif: String) -> &mut u64 {
        if !self.seen_motifs.contains(&motif) {
            self.seen_motifs.insert(motif.clone());
            self.motifs.push(motif.clone());
        }

        let row = match self.index.get(&accession) {
            Some(row) => *row,
            None => {
                let row = self.rows.len();
                self.index.insert(accession.clone(), row);
                self.accessions.push(accession);
                self.rows.push(HashMap::new());
                row
            }
        };

        self.rows[row].entry(motif).or_insert(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_fails_to_produce_a_dataset_when_no_class_is_provided() {
        let err = Builder::default()
            .insert("A1", "PWM1 name", 1)
            .try_build()
            .unwrap_err();

        assert_eq!(err.to_string(), "missing required field: class");
    }

    #[test]
    fn it_fails_when_the_class_is_provided_more_than_once(
    ) -> std::result::Result<(), Box<dyn std::error::Error>> {
        let err = Builder::default()
            .class(Class::Control)?
            .class(Class::Query)
            .unwrap_err();

        assert_eq!(err.to_string(), "singular field set multiple times: class");

        Ok(())
    }

    #[test]
    fn it_keeps_first_appearance_order() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let dataset = Builder::default()
            .class(Class::Control)?
            .insert("B", "M2", 1)
            .insert("A", "M1", 1)
            .insert("B", "M1", 4)
            .insert("C", "M3", 2)
            .try_build()?;

        assert_eq!(dataset.accessions().collect::<Vec<_>>(), ["B", "A", "C"]);
        assert_eq!(dataset.motifs(), ["M2", "M1", "M3"]);
        assert_eq!(dataset.count("B", "M1"), Some(4));
        assert_eq!(dataset.count("A", "M2"), None);

        Ok(())
    }

    #[test]
    fn it_produces_an_empty_dataset() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let dataset = Builder::default().class(Class::Query)?.try_build()?;
        assert!(dataset.is_empty());
        assert!(dataset.motifs().is_empty());
        Ok(())
    }
}
