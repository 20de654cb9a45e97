//! The motif columns of a count matrix.

use std::collections::HashSet;

use crate::dataset::Dataset;

/// The ordered set of motifs that make up the matrix columns.
///
/// The order is the control dataset's motifs in first-appearance order,
/// followed by any query motifs not already present. It is fixed at
/// construction and reused for every row.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Schema(Vec<String>);

impl Schema {
    /// Computes the union of the motifs observed in both datasets.
    ///
    /// # Examples
    ///
    /// ```
    /// use tfmatrix::dataset::Builder;
    /// use tfmatrix::dataset::Class;
    /// use tfmatrix::Schema;
    ///
    /// let control = Builder::default()
    ///     .class(Class::Control)?
    ///     .insert("A1", "PWM1 name", 5)
    ///     .insert("A2", "PWM3 third", 1)
    ///     .try_build()?;
    /// let query = Builder::default()
    ///     .class(Class::Query)?
    ///     .insert("B1", "PWM2 other", 2)
    ///     .insert("B1", "PWM1 name", 4)
    ///     .try_build()?;
    ///
    /// let schema = Schema::from_datasets(&control, &query);
    /// assert_eq!(
    ///     schema.iter().collect::<Vec<_>>(),
    ///     ["PWM1 name", "PWM3 third", "PWM2 other"]
    /// );
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn from_datasets(control: &Dataset, query: &Dataset) -> Self {
        let mut seen = HashSet::new();

        let motifs = control
            .motifs()
            .iter()
            .chain(query.motifs())
            .filter(|motif| seen.insert(*motif))
            .cloned()
            .collect();

        Self(motifs)
    }

    /// Gets the number of motif columns.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns whether there are no motif columns.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Gets an iterator over the motifs in column order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|motif| motif.as_str())
    }

    /// Gets the column index of a motif.
    pub fn position(&self, motif: &str) -> Option<usize> {
        self.0.iter().position(|m| m == motif)
    }

    /// Gets the motifs in column order.
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}
