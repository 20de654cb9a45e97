//! A dense sequence × motif count matrix.

use crate::dataset::Dataset;
use crate::schema::Schema;

pub mod writer;

pub use writer::Writer;

/// One row of a [`Matrix`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Row<'a> {
    /// The accession (sequence) the row describes.
    sequence: &'a str,

    /// The counts, one per schema motif, in schema order.
    counts: Vec<u64>,

    /// The class label.
    target: u8,
}

impl<'a> Row<'a> {
    /// Gets the sequence name.
    pub fn sequence(&self) -> &'a str {
        self.sequence
    }

    /// Gets the counts in schema order.
    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    /// Gets the class label.
    pub fn target(&self) -> u8 {
        self.target
    }
}

/// A count matrix over a control and a query dataset.
///
/// Rows are every control accession followed by every query accession, each
/// in first-appearance order. An accession present in both datasets yields
/// two rows. Columns are the [`Schema`] motifs; a missing count is `0`.
#[derive(Clone, Copy, Debug)]
pub struct Matrix<'a> {
    /// The control dataset.
    control: &'a Dataset,

    /// The query dataset.
    query: &'a Dataset,

    /// The motif columns.
    schema: &'a Schema,
}

impl<'a> Matrix<'a> {
    /// Creates a new matrix view over two datasets and a schema.
    ///
    /// # Examples
    ///
    /// ```
    /// use tfmatrix::dataset::Builder;
    /// use tfmatrix::dataset::Class;
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
    /// let matrix = Matrix::new(&control, &query, &schema);
    /// let rows = matrix.rows().collect::<Vec<_>>();
    ///
    /// assert_eq!(rows[0].sequence(), "A1");
    /// assert_eq!(rows[0].counts(), [5, 0]);
    /// assert_eq!(rows[0].target(), 0);
    ///
    /// assert_eq!(rows[1].sequence(), "B1");
    /// assert_eq!(rows[1].counts(), [0, 2]);
    /// assert_eq!(rows[1].target(), 1);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn new(control: &'a Dataset, query: &'a Dataset, schema: &'a Schema) -> Self {
        Self {
            control,
            query,
            schema,
        }
    }

    /// Gets the schema.
    pub fn schema(&self) -> &'a Schema {
        self.schema
    }

    /// Gets the number of rows.
    pub fn height(&self) -> usize {
        self.control.len() + self.query.len()
    }

    /// Gets the number of values in each row (motif columns plus the target).
    pub fn width(&self) -> usize {
        self.schema.len() + 1
    }

    /// Gets an iterator over the rows.
    pub fn rows(&self) -> impl Iterator<Item = Row<'a>> + 'a {
        let schema = self.schema;

        [self.control, self.query]
            .into_iter()
            .flat_map(move |dataset| {
                let target = dataset.class().target();

                dataset.rows().map(move |(sequence, counts)| Row {
                    sequence,
                    counts: schema
                        .iter()
                        .map(|motif| counts.get(motif).copied().unwrap_or(0))
                        .collect(),
                    target,
                })
            })
    }
}
