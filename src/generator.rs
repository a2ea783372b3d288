//! Materializes a [`FixtureSet`] on disk.
use std::io;
use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::SeedableRng;
use thiserror::Error;

use crate::checksum::{Checksum, ChecksumType};
use crate::config::{self, FixtureSet, FixtureSpec};
use crate::paths::{self, FixturePath};
use crate::table::{self, Compression};

/// Errors that abort a generation run.
#[derive(Debug, Error)]
pub enum Error {
    /// The fixture set failed validation.
    #[error("invalid fixture set: {0}")]
    InvalidSet(#[from] config::Error),
    /// A parent directory could not be created.
    #[error("failed to prepare directory: {0}")]
    Path(#[from] paths::Error),
    /// A random table could not be written.
    #[error("failed to write table: {0}")]
    Table(#[from] table::Error),
    /// The readme could not be written.
    #[error("failed to write readme {path:?}: {error}")]
    WriteReadme {
        path: PathBuf,
        #[source]
        error: io::Error,
    },
    /// A written file could not be read back to compute its checksum.
    #[error("failed to read back {path:?} for checksum: {error}")]
    Checksum {
        path: PathBuf,
        #[source]
        error: io::Error,
    },
}

/// Which list a generated file came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FixtureKind {
    Tracked,
    Untracked,
    Readme,
}

/// A single file written during a run.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GeneratedFile {
    pub path: FixturePath,
    pub kind: FixtureKind,
    pub compression: Compression,
    pub checksum: Checksum,
}

/// Every file written during a run, in the order they were written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    base_dir: PathBuf,
    files: Vec<GeneratedFile>,
}

impl Report {
    /// The directory all [`GeneratedFile::path`]s are relative to.
    #[must_use]
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    #[must_use]
    pub fn files(&self) -> &[GeneratedFile] {
        &self.files
    }

    /// Look up a generated file by its path relative to [`Report::base_dir`].
    pub fn get<P: AsRef<Path>>(&self, path: P) -> Option<&GeneratedFile> {
        let path = paths::normalize_path(path.as_ref());
        self.files.iter().find(|file| &*file.path == path.as_path())
    }

    /// Files generated from the given list.
    pub fn of_kind(&self, kind: FixtureKind) -> impl Iterator<Item = &GeneratedFile> + '_ {
        self.files.iter().filter(move |file| file.kind == kind)
    }
}

/// Writes the fixtures described by a [`FixtureSet`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Generator {
    set: FixtureSet,
}

impl From<FixtureSet> for Generator {
    fn from(set: FixtureSet) -> Self {
        Self::new(set)
    }
}

impl Generator {
    #[must_use]
    pub fn new(set: FixtureSet) -> Self {
        Self { set }
    }

    #[must_use]
    pub fn fixture_set(&self) -> &FixtureSet {
        &self.set
    }

    /// Generate every tracked table, then every untracked table, then the readme.
    ///
    /// A fresh generator seeded from [`FixtureSet::seed`] is used for each run, so repeated runs
    /// write byte-identical files. The first error stops the run; files already written are
    /// left in place.
    ///
    /// # Errors
    ///
    /// See [`Error`].
    #[tracing::instrument(skip_all, fields(base_dir = %self.set.base_dir.display(), seed = self.set.seed))]
    pub fn run(&self) -> Result<Report, Error> {
        self.set.validate()?;

        let mut rng = StdRng::seed_from_u64(self.set.seed);
        let mut files = Vec::with_capacity(self.set.tracked.len() + self.set.untracked.len() + 1);

        for spec in &self.set.tracked {
            files.push(self.write_table(spec, FixtureKind::Tracked, &mut rng)?);
        }
        for spec in &self.set.untracked {
            files.push(self.write_table(spec, FixtureKind::Untracked, &mut rng)?);
        }
        files.push(self.write_readme()?);

        tracing::info!(
            "wrote {} fixture files under {}",
            files.len(),
            self.set.base_dir.display()
        );

        Ok(Report {
            base_dir: self.set.base_dir.clone(),
            files,
        })
    }

    fn write_table(&self, spec: &FixtureSpec, kind: FixtureKind, rng: &mut StdRng) -> Result<GeneratedFile, Error> {
        tracing::info!("writing {}", spec.path);
        let full_path = spec.path.under(&self.set.base_dir);
        paths::ensure_parent_dir(&full_path)?;
        table::write_random_tsv(&full_path, spec.shape(), rng)?;

        let checksum = checksum_file(&full_path, self.set.checksum)?;
        tracing::debug!(path = %spec.path, %checksum, "wrote table");
        Ok(GeneratedFile {
            path: spec.path.clone(),
            kind,
            compression: Compression::for_path(&full_path),
            checksum,
        })
    }

    fn write_readme(&self) -> Result<GeneratedFile, Error> {
        let readme = &self.set.readme;
        let full_path = readme.path.under(&self.set.base_dir);
        paths::ensure_parent_dir(&full_path)?;
        std::fs::write(&full_path, &readme.contents).map_err(|error| Error::WriteReadme {
            path: full_path.clone(),
            error,
        })?;

        let checksum = self.set.checksum.checksum(&readme.contents);
        tracing::debug!(path = %readme.path, %checksum, "wrote readme");
        Ok(GeneratedFile {
            path: readme.path.clone(),
            kind: FixtureKind::Readme,
            compression: Compression::None,
            checksum,
        })
    }
}

fn checksum_file(path: &Path, typ: ChecksumType) -> Result<Checksum, Error> {
    let content = std::fs::read(path).map_err(|error| Error::Checksum {
        path: path.to_path_buf(),
        error,
    })?;
    Ok(typ.checksum(content))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Shape;

    fn small_set(base_dir: &Path) -> FixtureSet {
        FixtureSet {
            tracked: vec![
                FixtureSpec::new("a.tsv".parse().unwrap()),
                FixtureSpec {
                    path: "deep/er/b.tsv.gz".parse().unwrap(),
                    rows: 2,
                    columns: 3,
                },
            ],
            untracked: vec![FixtureSpec::new("ignored/c.tsv".parse().unwrap())],
            ..FixtureSet::default()
        }
        .with_base_dir(base_dir)
    }

    #[test]
    fn test_report_lists_files_in_write_order() {
        let temp = tempfile::tempdir().expect("failed to create temporary directory");
        let report = Generator::new(small_set(temp.path())).run().expect("run should succeed");

        let written: Vec<_> = report
            .files()
            .iter()
            .map(|file| (file.path.to_string(), file.kind))
            .collect();
        assert_eq!(
            written,
            vec![
                ("a.tsv".to_string(), FixtureKind::Tracked),
                ("deep/er/b.tsv.gz".to_string(), FixtureKind::Tracked),
                ("ignored/c.tsv".to_string(), FixtureKind::Untracked),
                ("README.md".to_string(), FixtureKind::Readme),
            ]
        );
        assert_eq!(report.base_dir(), temp.path());
        assert_eq!(report.of_kind(FixtureKind::Tracked).count(), 2);
    }

    #[test]
    fn test_report_checksums_match_disk() {
        let temp = tempfile::tempdir().expect("failed to create temporary directory");
        let report = Generator::new(small_set(temp.path())).run().expect("run should succeed");

        for file in report.files() {
            let content = std::fs::read(file.path.under(temp.path())).expect("generated file should exist");
            assert_eq!(file.checksum, ChecksumType::MD5.checksum(content), "{}", file.path);
        }
        assert_eq!(
            report.get("deep/er/b.tsv.gz").map(|file| file.compression),
            Some(Compression::Gzip)
        );
        assert_eq!(report.get("./a.tsv").map(|file| file.compression), Some(Compression::None));
        assert!(report.get("missing.tsv").is_none());
    }

    #[test]
    fn test_tables_follow_single_random_stream() {
        // One stream per run: the first table matches a fresh stream, later ones do not repeat it.
        let temp = tempfile::tempdir().expect("failed to create temporary directory");
        Generator::new(small_set(temp.path())).run().expect("run should succeed");

        let mut rng = StdRng::seed_from_u64(0);
        let first = table::RandomTable::generate(&mut rng, Shape::default());
        let mut expected = Vec::new();
        first.write_tsv(&mut expected).unwrap();
        assert_eq!(std::fs::read(temp.path().join("a.tsv")).unwrap(), expected);

        let third = std::fs::read(temp.path().join("ignored").join("c.tsv")).unwrap();
        assert_ne!(third, expected);
    }

    #[test]
    fn test_invalid_set_writes_nothing() {
        let temp = tempfile::tempdir().expect("failed to create temporary directory");
        let mut set = small_set(temp.path());
        set.untracked.push(FixtureSpec::new("a.tsv".parse().unwrap()));

        let error = Generator::new(set).run().expect_err("duplicate path should fail");
        assert!(matches!(error, Error::InvalidSet(config::Error::DuplicatePath(_))));
        assert_eq!(std::fs::read_dir(temp.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_sha256_checksums() {
        let temp = tempfile::tempdir().expect("failed to create temporary directory");
        let set = FixtureSet {
            checksum: ChecksumType::SHA256,
            ..small_set(temp.path())
        };
        let report = Generator::new(set).run().expect("run should succeed");
        assert!(report.files().iter().all(|file| file.checksum.typ() == ChecksumType::SHA256));
    }
}
