//! Content hash algorithms for object addressing.
//!
//! Every object store address is derived from the digest of the file's
//! bytes, so the algorithm is an explicit, versioned configuration
//! value rather than an implicit global: switching it re-addresses the
//! entire store and must be a deliberate, config-level act.

use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha1::Sha1;
use sha2::{Digest, Sha256};

/// Buffer size for reading files during digest calculation (64KB).
const BUFFER_SIZE: usize = 64 * 1024;

/// Content hash algorithm used to address the object store.
///
/// `Sha1` is the default: existing distributions address their objects
/// by SHA-1, and a store shared between builds must keep a single
/// addressing scheme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    #[default]
    Sha1,
    Sha256,
}

impl HashAlgorithm {
    /// Digest a byte slice, returning the lowercase hex digest.
    pub fn digest_bytes(&self, bytes: &[u8]) -> String {
        match self {
            HashAlgorithm::Sha1 => format!("{:x}", Sha1::digest(bytes)),
            HashAlgorithm::Sha256 => format!("{:x}", Sha256::digest(bytes)),
        }
    }

    /// Digest a file's contents, returning the lowercase hex digest.
    ///
    /// Reads in 64KB chunks so large archives never sit in memory
    /// whole.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or read.
    pub fn digest_file(&self, path: &Path) -> io::Result<String> {
        let mut file = File::open(path)?;
        let mut buffer = vec![0u8; BUFFER_SIZE];

        match self {
            HashAlgorithm::Sha1 => {
                let mut hasher = Sha1::new();
                loop {
                    let bytes_read = file.read(&mut buffer)?;
                    if bytes_read == 0 {
                        break;
                    }
                    hasher.update(&buffer[..bytes_read]);
                }
                Ok(format!("{:x}", hasher.finalize()))
            }
            HashAlgorithm::Sha256 => {
                let mut hasher = Sha256::new();
                loop {
                    let bytes_read = file.read(&mut buffer)?;
                    if bytes_read == 0 {
                        break;
                    }
                    hasher.update(&buffer[..bytes_read]);
                }
                Ok(format!("{:x}", hasher.finalize()))
            }
        }
    }

    /// Stable identifier used in configuration files.
    pub fn as_str(&self) -> &'static str {
        match self {
            HashAlgorithm::Sha1 => "sha1",
            HashAlgorithm::Sha256 => "sha256",
        }
    }

    /// Length of the hex digest produced by this algorithm.
    pub fn digest_len(&self) -> usize {
        match self {
            HashAlgorithm::Sha1 => 40,
            HashAlgorithm::Sha256 => 64,
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
