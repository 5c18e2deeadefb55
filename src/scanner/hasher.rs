//! BLAKE3 file hasher.
//!
//! # Overview
//!
//! This module provides the [`Hasher`] struct for computing BLAKE3 digests
//! of complete file contents. Small files are streamed through a buffered
//! reader; files at or above [`MMAP_THRESHOLD`] are memory-mapped and hashed
//! with blake3's multithreaded implementation.
//!
//! The [`ContentDigest`] trait is the seam the grouping stage hashes
//! through, so alternative digesters can be substituted in tests.
//!
//! # Example
//!
//! ```no_run
//! use dupfinder::scanner::{ContentDigest, Hasher};
//! use std::path::Path;
//!
//! let hasher = Hasher::new();
//! let digest = hasher.digest(Path::new("photo.jpg")).unwrap();
//! println!("{digest}");
//! ```

use std::fmt;
use std::fs::File;
use std::path::Path;

use serde::{Serialize, Serializer};

use super::HashError;

/// Files this large or larger are hashed through a memory map.
pub const MMAP_THRESHOLD: u64 = 16 * 1024 * 1024;

/// A 256-bit BLAKE3 content digest.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Digest(pub [u8; 32]);

impl Digest {
    /// Raw digest bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Digest as a lowercase hexadecimal string.
    #[must_use]
    pub fn to_hex(&self) -> String {
        hash_to_hex(&self.0)
    }
}

impl From<blake3::Hash> for Digest {
    fn from(hash: blake3::Hash) -> Self {
        Self(*hash.as_bytes())
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", self.to_hex())
    }
}

impl Serialize for Digest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

/// Format raw hash bytes as lowercase hex.
#[must_use]
pub fn hash_to_hex(hash: &[u8]) -> String {
    use std::fmt::Write;

    hash.iter().fold(String::with_capacity(hash.len() * 2), |mut out, b| {
        let _ = write!(out, "{b:02x}");
        out
    })
}

/// Something that can fingerprint the full content of a file.
///
/// Two files are treated as duplicates iff their digests are equal, so an
/// implementation must return identical digests for identical content.
pub trait ContentDigest: Send + Sync {
    /// Compute the digest of the complete file at `path`.
    ///
    /// # Errors
    ///
    /// Returns a [`HashError`] if the file cannot be opened or read.
    fn digest(&self, path: &Path) -> Result<Digest, HashError>;
}

/// BLAKE3 hasher for whole files.
#[derive(Debug, Clone)]
pub struct Hasher {
    mmap_threshold: u64,
}

impl Default for Hasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher {
    /// Create a hasher with the default memory-map threshold.
    #[must_use]
    pub fn new() -> Self {
        Self {
            mmap_threshold: MMAP_THRESHOLD,
        }
    }

    /// Override the size at which files are memory-mapped.
    #[must_use]
    pub fn with_mmap_threshold(mut self, bytes: u64) -> Self {
        self.mmap_threshold = bytes;
        self
    }

    /// Hash an in-memory byte slice.
    #[must_use]
    pub fn hash_bytes(bytes: &[u8]) -> Digest {
        blake3::hash(bytes).into()
    }

    /// Hash the complete content of the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`HashError`] when the file cannot be opened, stat'ed or read.
    pub fn full_hash(&self, path: &Path) -> Result<Digest, HashError> {
        let io_err = |e| HashError::from_io(path.to_path_buf(), e);

        let file = File::open(path).map_err(io_err)?;
        let len = file.metadata().map_err(io_err)?.len();

        let mut hasher = blake3::Hasher::new();
        if len >= self.mmap_threshold {
            log::debug!(
                "Hashing large file ({} MB) via mmap: {}",
                len / (1024 * 1024),
                path.display()
            );
            hasher.update_mmap_rayon(path).map_err(io_err)?;
        } else {
            hasher.update_reader(file).map_err(io_err)?;
        }

        Ok(hasher.finalize().into())
    }
}

impl ContentDigest for Hasher {
    fn digest(&self, path: &Path) -> Result<Digest, HashError> {
        self.full_hash(path)
    }
}
