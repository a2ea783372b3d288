//! Relative fixture paths and the directory resolver used before each write.
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::io;
use std::ops::Deref;
use std::path::{Component, Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// Errors that may occur while validating or resolving fixture paths.
#[derive(Debug, Error)]
pub enum Error {
    /// The path given to [`FixturePath::try_from()`] was invalid.
    ///
    /// A fixture path must be relative, non-empty, and must not escape the base directory
    /// once normalized, e.g.
    ///   - `/data/in.tsv`
    ///   - `../in.tsv`
    ///   - `data/../../in.tsv`
    #[error("invalid fixture path: {0:?}")]
    InvalidRelativePath(PathBuf),
    /// A parent directory could not be created.
    #[error("failed to create directory {path:?}: {error}")]
    CreateDir {
        path: PathBuf,
        #[source]
        error: io::Error,
    },
}

/// Normalize a path lexically, dropping `.` and resolving `..` against earlier components.
///
/// Symlinks are not followed and the filesystem is not touched.
#[must_use]
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut ret = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(prefix) => ret.push(prefix.as_os_str()),
            Component::RootDir => ret.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(ret.components().last(), None | Some(Component::ParentDir)) {
                    ret.push(Component::ParentDir);
                } else {
                    ret.pop();
                }
            }
            Component::Normal(c) => ret.push(c),
        }
    }
    ret
}

/// A normalized path relative to a fixture set's base directory.
#[repr(transparent)]
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct FixturePath(PathBuf);

impl FixturePath {
    /// Wrap a compiled-in path that is known to be relative and non-escaping.
    ///
    /// The path is normalized but not validated, so this is only for constants.
    pub(crate) fn builtin(path: &'static str) -> Self {
        Self(normalize_path(Path::new(path)))
    }

    /// Join this path onto `base`.
    #[must_use]
    pub fn under(&self, base: &Path) -> PathBuf {
        base.join(&self.0)
    }
}

impl TryFrom<PathBuf> for FixturePath {
    type Error = Error;

    fn try_from(value: PathBuf) -> Result<Self, Self::Error> {
        let normalized = normalize_path(&value);
        let escapes = matches!(normalized.components().next(), Some(Component::ParentDir));
        if value.has_root() || normalized.is_absolute() || escapes || normalized.file_name().is_none() {
            Err(Error::InvalidRelativePath(value))
        } else {
            Ok(Self(normalized))
        }
    }
}

impl FromStr for FixturePath {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(PathBuf::from(s))
    }
}

impl<'de> Deserialize<'de> for FixturePath {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let path = PathBuf::deserialize(deserializer)?;
        Self::try_from(path).map_err(serde::de::Error::custom)
    }
}

impl AsRef<Path> for FixturePath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Deref for FixturePath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for FixturePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

/// Make sure every directory above `path` exists, then hand `path` back.
///
/// Existing directories are not an error.
///
/// # Errors
///
/// [`Error::CreateDir`] if any missing directory could not be created.
pub fn ensure_parent_dir(path: &Path) -> Result<&Path, Error> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        if !parent.is_dir() {
            tracing::debug!(dir = %parent.display(), "creating directory");
        }
        std::fs::create_dir_all(parent).map_err(|error| Error::CreateDir {
            path: parent.to_path_buf(),
            error,
        })?;
    }
    Ok(path)
}
