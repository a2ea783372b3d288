//! Checksums of generated fixture files.
//!
//! The data-tracking tools that consume these fixtures identify files by digest, so every
//! written file is reported together with the digest of its on-disk bytes.
use md5::Md5;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// The types of checksums that can be computed for a fixture.
#[derive(Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Copy, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChecksumType {
    /// MD5, the digest data-tracking manifests usually store.
    #[default]
    MD5,
    /// SHA256.
    SHA256,
}

impl ChecksumType {
    /// Compute a checksum of this type over `data`.
    ///
    /// ```
    /// # use tsv_fixtures::checksum::{Checksum, ChecksumType};
    /// let checksum = ChecksumType::MD5.checksum("testing");
    /// assert_eq!(checksum, Checksum::MD5("ae2b1fca515949e5d54fb22b8ed95575".to_string()));
    /// ```
    #[must_use]
    pub fn checksum<D: AsRef<[u8]>>(self, data: D) -> Checksum {
        match self {
            Self::MD5 => Checksum::MD5(hex::encode(Md5::digest(data.as_ref()))),
            Self::SHA256 => Checksum::SHA256(hex::encode(Sha256::digest(data.as_ref()))),
        }
    }
}

/// A file's checksum as a lowercase hex string.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Checksum {
    MD5(String),
    SHA256(String),
}

impl Checksum {
    /// Returns the [`ChecksumType`] for this `Checksum`.
    #[must_use]
    pub fn typ(&self) -> ChecksumType {
        match self {
            Self::MD5(_) => ChecksumType::MD5,
            Self::SHA256(_) => ChecksumType::SHA256,
        }
    }

    /// The bare hex digest.
    #[must_use]
    pub fn hex(&self) -> &str {
        match self {
            Self::MD5(hex) | Self::SHA256(hex) => hex,
        }
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MD5(md5) => write!(f, "md5({})", md5),
            Self::SHA256(sha256) => write!(f, "sha256({})", sha256),
        }
    }
}
