//! Where converted output is written.
//!
//! File output is staged in a temporary file next to the destination and
//! only persisted into place by [`Sink::commit()`]. A sink that is dropped
//! without being committed deletes its temporary file, so a failed run never
//! leaves behind an output that looks complete.

use std::io;
use std::io::BufWriter;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use tempfile::NamedTempFile;
use tracing::debug;

/// The prefix of a staged output file.
const STAGING_PREFIX: &str = ".tfmatrix";

/// The suffix of a staged output file.
const STAGING_SUFFIX: &str = ".partial";

/// An output destination.
#[derive(Debug)]
pub enum Sink {
    /// Standard output.
    Stdout(BufWriter<io::Stdout>),

    /// A file that is staged until committed.
    File {
        /// The staged output.
        writer: BufWriter<NamedTempFile>,

        /// The path the output is persisted to on commit.
        destination: PathBuf,
    },
}

impl Sink {
    /// Creates a sink over standard output.
    pub fn stdout() -> Self {
        Sink::Stdout(BufWriter::new(io::stdout()))
    }

    /// Creates a sink that stages output for `destination`.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::io::Write as _;
    ///
    /// use tfmatrix::Sink;
    ///
    /// let dir = std::env::temp_dir().join("tfmatrix-sink-doc");
    /// std::fs::create_dir_all(&dir)?;
    /// let destination = dir.join("out.tsv");
    ///
    /// let mut sink = Sink::create(&destination)?;
    /// writeln!(sink, "Sequence\tTarget")?;
    /// assert!(!destination.exists());
    ///
    /// sink.commit()?;
    /// assert_eq!(std::fs::read_to_string(&destination)?, "Sequence\tTarget\n");
    ///
    /// # std::fs::remove_dir_all(&dir)?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn create<P>(destination: P) -> io::Result<Self>
    where
        P: AsRef<Path>,
    {
        let destination = destination.as_ref().to_path_buf();

        // The staged file must live on the same filesystem as the destination
        // for the final rename to succeed.
        let dir = match destination.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let file = tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .suffix(STAGING_SUFFIX)
            .tempfile_in(dir)?;
        debug!("staging output in {}", file.path().display());

        Ok(Sink::File {
            writer: BufWriter::new(file),
            destination,
        })
    }

    /// Creates a sink for an optional path, where `None` or `-` means
    /// standard output.
    pub fn from_path<P>(path: Option<P>) -> io::Result<Self>
    where
        P: AsRef<Path>,
    {
        match path {
            Some(path) if path.as_ref() != Path::new("-") => Self::create(path),
            _ => Ok(Self::stdout()),
        }
    }

    /// Flushes the output and, for a file, moves it into place.
    pub fn commit(self) -> io::Result<()> {
        match self {
            Sink::Stdout(mut writer) => writer.flush(),
            Sink::File {
                writer,
                destination,
            } => {
                let file = writer.into_inner().map_err(|e| e.into_error())?;
                file.as_file().sync_all()?;
                file.persist(&destination)?;
                debug!("wrote {}", destination.display());
                Ok(())
            }
        }
    }
}

impl Write for Sink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Sink::Stdout(writer) => writer.write(buf),
            Sink::File { writer, .. } => writer.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Sink::Stdout(writer) => writer.flush(),
            Sink::File { writer, .. } => writer.flush(),
        }
    }
}
