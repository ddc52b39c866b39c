//! Content-addressed object store.
//!
//! Objects are raw file bytes stored at
//! `<root>/<hash[0:2]>/<hash[2:4]>/<hash>`. The two-level fan-out keeps
//! any single directory's entry count bounded even for
//! hundred-thousand-file source trees.
//!
//! The store is a process-wide shared resource: multiple distributions
//! may publish into the same root, and identical content converges on
//! one physical file regardless of how many source files carried it.
//! Nothing in the store is ever deleted by a build.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

/// A content-addressed object store rooted at a directory.
#[derive(Debug, Clone)]
pub struct ObjectStore {
    root: PathBuf,
}

impl ObjectStore {
    /// Create a handle to the store rooted at `root`.
    ///
    /// The directory itself is created lazily on first publish.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory of the store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Store-relative location for a hex digest: `aa/bb/<hash>`.
    ///
    /// This string is what manifests record as an entry's `location`;
    /// the installer resolves it against the distribution's objects
    /// URL. `hash` must be a hex digest of at least four characters.
    pub fn relative_location(hash: &str) -> String {
        debug_assert!(hash.len() >= 4, "hash too short for fan-out");
        format!("{}/{}/{}", &hash[0..2], &hash[2..4], hash)
    }

    /// Absolute path of the object for `hash` beneath the store root.
    pub fn object_path(&self, hash: &str) -> PathBuf {
        debug_assert!(hash.len() >= 4, "hash too short for fan-out");
        self.root.join(&hash[0..2]).join(&hash[2..4]).join(hash)
    }

    /// Whether an object with this hash is already present.
    pub fn contains(&self, hash: &str) -> bool {
        self.object_path(hash).exists()
    }

    /// Publish the bytes of `source` under `hash`.
    ///
    /// Returns `true` if the bytes were written, `false` if an object
    /// with this hash was already present and the copy was skipped.
    /// This is the deduplication point: any number of source files with
    /// identical content map to one physical object.
    ///
    /// Directory creation is idempotent under concurrent creation by
    /// sibling workers, and the object file is opened with
    /// `create_new`, so when two workers race on the same new hash
    /// exactly one writes the bytes; the loser observes the existing
    /// file and skips.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be read or the object
    /// cannot be written. A partially written object is removed before
    /// the error is returned.
    pub fn publish(&self, source: &Path, hash: &str) -> io::Result<bool> {
        let bucket = self.root.join(&hash[0..2]).join(&hash[2..4]);
        let dest = bucket.join(hash);

        if dest.exists() {
            trace!(hash, "Object already present, skipping copy");
            return Ok(false);
        }

        let mut input = File::open(source)?;
        fs::create_dir_all(&bucket)?;

        let mut output = match OpenOptions::new().write(true).create_new(true).open(&dest) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                // Lost the creation race to a sibling worker.
                trace!(hash, "Object created concurrently, skipping copy");
                return Ok(false);
            }
            Err(e) => return Err(e),
        };

        if let Err(e) = io::copy(&mut input, &mut output) {
            drop(output);
            let _ = fs::remove_file(&dest);
            return Err(e);
        }

        debug!(hash, source = %source.display(), "Published object");
        Ok(true)
    }
}
