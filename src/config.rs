//! The set of fixtures to generate.
//!
//! [`FixtureSet::default()`] is the fixed tree that the `tsv-fixtures` binary writes. A set can
//! also be read from TOML so that tests and other tools can ask for smaller or different trees:
//!
//! ```toml
//! base_dir = "test_project"
//! seed = 0
//! checksum = "md5"
//!
//! [[tracked]]
//! path = "data/in.tsv"
//! rows = 10
//! columns = 5
//!
//! [[untracked]]
//! path = "data/untracked_file.tsv"
//!
//! [readme]
//! path = "README.md"
//! contents = "## README\nA fake readme.\n"
//! ```
//!
//! Any top-level key that is left out takes its value from the default set. Use `untracked = []`
//! to generate no untracked files.
use std::collections::BTreeSet;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::checksum::ChecksumType;
use crate::paths::FixturePath;
use crate::table::{Shape, DEFAULT_COLUMNS, DEFAULT_ROWS};

/// Directory the fixture tree is written under, relative to the working directory.
pub const DEFAULT_BASE_DIR: &str = "test_project";
/// Seed for the random generator.
pub const DEFAULT_SEED: u64 = 0;
/// Files the consuming project is expected to track.
pub const TRACKED_FILES: [&str; 5] = [
    "data/in.tsv",
    "data/raw/data_1.tsv",
    "data/raw/data_2.tsv",
    "data/raw/data_3.tsv.gz",
    "data/supplement/figure_1.tsv",
];
/// Files the consuming project is expected to ignore.
pub const UNTRACKED_FILES: [&str; 1] = ["data/untracked_file.tsv"];
pub const README_PATH: &str = "README.md";
pub const README_CONTENTS: &str = "## README\nA fake readme.\n";

/// Errors that can happen while loading or checking a [`FixtureSet`].
#[derive(Debug, Error)]
pub enum Error {
    /// Error while reading a fixture set file.
    #[error("failed to read fixture set {path:?}: {error}")]
    ReadConfig {
        path: PathBuf,
        #[source]
        error: io::Error,
    },
    /// Error while parsing a TOML fixture set.
    #[error("failed to parse TOML fixture set: {0}")]
    DeserializeTOML(#[from] toml::de::Error),
    /// The same path appears more than once across the tracked, untracked, and readme entries.
    #[error("fixture path listed more than once: {0}")]
    DuplicatePath(FixturePath),
    /// A table was configured with no columns, so it would have no header fields.
    #[error("fixture {0} must have at least one column")]
    EmptyShape(FixturePath),
}

fn default_rows() -> usize {
    DEFAULT_ROWS
}

fn default_columns() -> usize {
    DEFAULT_COLUMNS
}

/// A single random table fixture.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FixtureSpec {
    pub path: FixturePath,
    #[serde(default = "default_rows")]
    pub rows: usize,
    #[serde(default = "default_columns")]
    pub columns: usize,
}

impl FixtureSpec {
    /// A fixture with the default 10x5 shape.
    #[must_use]
    pub fn new(path: FixturePath) -> Self {
        Self {
            path,
            rows: DEFAULT_ROWS,
            columns: DEFAULT_COLUMNS,
        }
    }

    #[must_use]
    pub fn shape(&self) -> Shape {
        Shape {
            rows: self.rows,
            columns: self.columns,
        }
    }
}

/// The static readme written after all tables.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReadmeSpec {
    pub path: FixturePath,
    pub contents: String,
}

impl Default for ReadmeSpec {
    fn default() -> Self {
        Self {
            path: FixturePath::builtin(README_PATH),
            contents: README_CONTENTS.to_string(),
        }
    }
}

/// Everything needed to materialize one fixture tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FixtureSet {
    pub base_dir: PathBuf,
    pub seed: u64,
    pub checksum: ChecksumType,
    pub tracked: Vec<FixtureSpec>,
    pub untracked: Vec<FixtureSpec>,
    pub readme: ReadmeSpec,
}

fn builtin_specs(paths: &[&'static str]) -> Vec<FixtureSpec> {
    paths
        .iter()
        .map(|&path| FixtureSpec::new(FixturePath::builtin(path)))
        .collect()
}

impl Default for FixtureSet {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from(DEFAULT_BASE_DIR),
            seed: DEFAULT_SEED,
            checksum: ChecksumType::default(),
            tracked: builtin_specs(&TRACKED_FILES),
            untracked: builtin_specs(&UNTRACKED_FILES),
            readme: ReadmeSpec::default(),
        }
    }
}

impl FixtureSet {
    /// Parse and validate a fixture set from a TOML string.
    ///
    /// # Errors
    ///
    /// - [`Error::DeserializeTOML`] if the string is not a valid fixture set
    /// - Any error from [`FixtureSet::validate`]
    pub fn from_toml_str(s: &str) -> Result<Self, Error> {
        let set: Self = toml::from_str(s)?;
        set.validate()?;
        Ok(set)
    }

    /// Read, parse, and validate a fixture set from a TOML file.
    ///
    /// # Errors
    ///
    /// [`Error::ReadConfig`] if the file cannot be read, otherwise as [`FixtureSet::from_toml_str`].
    pub fn from_file(path: &Path) -> Result<Self, Error> {
        tracing::debug!(path = %path.display(), "reading fixture set");
        let s = std::fs::read_to_string(path).map_err(|error| Error::ReadConfig {
            path: path.to_path_buf(),
            error,
        })?;
        Self::from_toml_str(&s)
    }

    /// The same set, written under `base_dir` instead.
    #[must_use]
    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = base_dir.into();
        self
    }

    /// Check that every path is written once and every table has a header.
    ///
    /// # Errors
    ///
    /// [`Error::DuplicatePath`] or [`Error::EmptyShape`].
    pub fn validate(&self) -> Result<(), Error> {
        let mut seen = BTreeSet::new();
        for spec in self.tracked.iter().chain(&self.untracked) {
            if spec.columns == 0 {
                return Err(Error::EmptyShape(spec.path.clone()));
            }
            if !seen.insert(&spec.path) {
                return Err(Error::DuplicatePath(spec.path.clone()));
            }
        }
        if seen.contains(&self.readme.path) {
            return Err(Error::DuplicatePath(self.readme.path.clone()));
        }
        Ok(())
    }
}
