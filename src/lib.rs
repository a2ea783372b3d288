//! Generate reproducible trees of random TSV fixtures.
//!
//! The default [`FixtureSet`] writes this tree under `test_project/`:
//!
//! ```text
//! data/in.tsv
//! data/raw/data_1.tsv
//! data/raw/data_2.tsv
//! data/raw/data_3.tsv.gz
//! data/supplement/figure_1.tsv
//! data/untracked_file.tsv
//! README.md
//! ```
//!
//! Every table has five random five-letter column headers and ten rows of values drawn
//! uniformly from `[0, 1)`. Files ending in `.gz` are gzip-compressed. The random generator
//! is seeded from the fixture set, so the same set always produces the same bytes.
//!
//! ```no_run
//! use tsv_fixtures::{FixtureSet, Generator};
//!
//! let report = Generator::new(FixtureSet::default().with_base_dir("scratch")).run()?;
//! for file in report.files() {
//!     println!("{} {}", file.checksum, file.path);
//! }
//! # Ok::<(), tsv_fixtures::Error>(())
//! ```
pub mod checksum;
pub mod config;
pub mod generator;
pub mod logging;
pub mod paths;
pub mod table;

pub use config::FixtureSet;
pub use generator::{Error, FixtureKind, GeneratedFile, Generator, Report};
