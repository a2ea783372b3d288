//! Random numeric tables and their tab-separated serialization.
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use flate2::write::GzEncoder;
use flate2::Compression as GzLevel;
use rand::Rng;
use thiserror::Error;

/// Rows in a table when no shape is configured.
pub const DEFAULT_ROWS: usize = 10;
/// Columns in a table when no shape is configured.
pub const DEFAULT_COLUMNS: usize = 5;
/// Characters in every generated column header.
pub const HEADER_LEN: usize = 5;

/// Suffix that marks a fixture as gzip-compressed.
pub const GZIP_SUFFIX: &str = ".gz";

const HEADER_ALPHABET: &[u8; 52] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";
const FIELD_SEPARATOR: &str = "\t";

/// Errors that may occur while writing a table to disk.
#[derive(Debug, Error)]
pub enum Error {
    /// The target file could not be created or truncated.
    #[error("failed to create {path:?}: {error}")]
    Create {
        path: PathBuf,
        #[source]
        error: io::Error,
    },
    /// Writing or compressing the table contents failed.
    #[error("failed to write {path:?}: {error}")]
    Write {
        path: PathBuf,
        #[source]
        error: io::Error,
    },
}

/// The dimensions of a generated table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    pub rows: usize,
    pub columns: usize,
}

impl Default for Shape {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            columns: DEFAULT_COLUMNS,
        }
    }
}

/// How a fixture's bytes are encoded on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Compression {
    None,
    Gzip,
}

impl Compression {
    /// Pick the encoding from the file name: `.gz` means gzip.
    #[must_use]
    pub fn for_path(path: &Path) -> Self {
        let is_gzip = path
            .file_name()
            .and_then(|name| name.to_str())
            .map_or(false, |name| name.ends_with(GZIP_SUFFIX));
        if is_gzip {
            Self::Gzip
        } else {
            Self::None
        }
    }
}

/// A rectangular table of uniform random values in `[0, 1)` with random alphabetic headers.
#[derive(Debug, Clone, PartialEq)]
pub struct RandomTable {
    headers: Vec<String>,
    rows: Vec<Vec<f64>>,
}

impl RandomTable {
    /// Draw a new table from `rng`.
    ///
    /// All headers are drawn first, then the cells in row-major order, so the same generator
    /// state always yields the same table.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R, shape: Shape) -> Self {
        let headers = (0..shape.columns)
            .map(|_| random_header(rng))
            .collect();
        let rows = (0..shape.rows)
            .map(|_| (0..shape.columns).map(|_| rng.gen::<f64>()).collect())
            .collect();
        Self { headers, rows }
    }

    #[must_use]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    #[must_use]
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    #[must_use]
    pub fn shape(&self) -> Shape {
        Shape {
            rows: self.rows.len(),
            columns: self.headers.len(),
        }
    }

    /// Serialize as TSV: one header line, then one line per row, each ending in `\n`.
    ///
    /// # Errors
    ///
    /// Any I/O error from `writer`.
    pub fn write_tsv<W: Write>(&self, mut writer: W) -> io::Result<()> {
        writeln!(writer, "{}", self.headers.join(FIELD_SEPARATOR))?;
        for row in &self.rows {
            let line = row
                .iter()
                .map(f64::to_string)
                .collect::<Vec<_>>()
                .join(FIELD_SEPARATOR);
            writeln!(writer, "{}", line)?;
        }
        Ok(())
    }
}

fn random_header<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..HEADER_LEN)
        .map(|_| char::from(HEADER_ALPHABET[rng.gen_range(0..HEADER_ALPHABET.len())]))
        .collect()
}

/// Write `table` to `path`, gzip-compressed if `compression` says so.
///
/// The parent directory must already exist. An existing file at `path` is truncated and
/// overwritten, and a new file gets the same default permissions as any other created file.
///
/// # Errors
///
/// See [`Error`].
pub fn write_table(path: &Path, table: &RandomTable, compression: Compression) -> Result<(), Error> {
    let file = File::create(path).map_err(|error| Error::Create {
        path: path.to_path_buf(),
        error,
    })?;

    let write_err = |error| Error::Write {
        path: path.to_path_buf(),
        error,
    };

    match compression {
        Compression::None => {
            let mut writer = BufWriter::new(file);
            table.write_tsv(&mut writer).map_err(write_err)?;
            writer.flush().map_err(write_err)?;
        }
        Compression::Gzip => {
            let mut encoder = GzEncoder::new(BufWriter::new(file), GzLevel::default());
            table.write_tsv(&mut encoder).map_err(write_err)?;
            let mut inner = encoder.finish().map_err(write_err)?;
            inner.flush().map_err(write_err)?;
        }
    }
    Ok(())
}

/// Generate a table of the given shape and write it to `path`.
///
/// # Errors
///
/// See [`write_table`].
pub fn write_random_tsv<R: Rng + ?Sized>(path: &Path, shape: Shape, rng: &mut R) -> Result<RandomTable, Error> {
    let table = RandomTable::generate(rng, shape);
    write_table(path, &table, Compression::for_path(path))?;
    Ok(table)
}
