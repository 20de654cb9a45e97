//! `tfmatrix` is a crate for turning transcription factor binding site scans
//! into count matrices for downstream classification.
//!
//! The crate is built around a single, linear pipeline:
//!
//! 1. Read a control and a query scan into a pair of
//!    [`Dataset`](crate::dataset::Dataset)s (one row per accession, one count
//!    per motif).
//! 2. Compute the [`Schema`], the union of all motifs observed in either
//!    dataset, exactly once.
//! 3. Emit a [`Matrix`] with a `Sequence` column, one column per motif in
//!    schema order, and a `Target` column holding the class label (`0` for
//!    control rows, `1` for query rows).
//!
//! Two scanners are supported as inputs. tfSearch output is read with
//! [`dataset::read_tfsearch()`]: only lines carrying the `::` qualifier are
//! hits, and a repeated (accession, motif) pair keeps the last count seen.
//! FIMO `--text` output is read with [`dataset::read_fimo()`]: every line
//! after the header is a single occurrence, so counts accumulate.
//!
//! ```
//! use tfmatrix::dataset;
//! use tfmatrix::dataset::Class;
//! use tfmatrix::matrix::Writer;
//! use tfmatrix::record::hit::Config;
//! use tfmatrix::Matrix;
//! use tfmatrix::Reader;
//! use tfmatrix::Schema;
//!
//! let config = Config::default();
//!
//! let control = b"A1 x PWM1 name, :: 5(0.21)";
//! let control = dataset::read_tfsearch(&mut Reader::new(&control[..]), Class::Control, &config)?;
//!
//! let query = b"B1 x PWM2 other, :: 2(0.35)";
//! let query = dataset::read_tfsearch(&mut Reader::new(&query[..]), Class::Query, &config)?;
//!
//! let schema = Schema::from_datasets(&control, &query);
//! let mut writer = Writer::new(Vec::new());
//! writer.write_matrix(&Matrix::new(&control, &query, &schema))?;
//!
//! assert_eq!(
//!     String::from_utf8(writer.into_inner()?)?,
//!     "Sequence\tPWM1 name\tPWM2 other\tTarget\n\
//!      A1\t5\t0\t0\n\
//!      B1\t0\t2\t1\n"
//! );
//!
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! The crate also carries a small SAM to FASTQ converter ([`fastq`]) used
//! earlier in the same pipeline.

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![warn(rust_2021_compatibility)]
#![warn(missing_debug_implementations)]
#![warn(clippy::missing_docs_in_private_items)]
#![warn(rustdoc::broken_intra_doc_links)]

pub mod dataset;
pub mod fastq;
pub mod line;
pub mod matrix;
pub mod reader;
pub mod record;
pub mod schema;
pub mod sink;

pub use line::Line;
pub use matrix::Matrix;
pub use schema::Schema;
pub use sink::Sink;

pub use self::reader::Reader;
