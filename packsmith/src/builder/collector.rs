//! The hash-and-publish pipeline.
//!
//! Candidates gathered by the walker are processed on the rayon worker
//! pool: each file is hashed, redirect sidecars are resolved, bytes are
//! published into the object store, and the finished install tasks are
//! folded into the manifest by a single-threaded reduction. No mutable
//! state is shared between workers; each candidate produces an
//! independent result.
//!
//! A failing candidate never aborts the others. Failures are logged
//! with their file context, counted, and reported once as an aggregate
//! error after the whole tree has been processed.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::Path;

use rayon::prelude::*;
use tracing::{debug, error, info, warn};

use super::annotator::EntryAnnotator;
use super::error::{BuildError, BuildResult};
use super::sidecar::{self, UrlRedirect};
use super::walker::{walk_tree, Candidate};
use crate::hash::HashAlgorithm;
use crate::manifest::{Manifest, ManifestEntry};
use crate::store::ObjectStore;

/// Counters reported after a collection pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollectStats {
    /// Install tasks appended to the manifest.
    pub entries: usize,
    /// Objects physically written to the store.
    pub objects_written: usize,
    /// Candidates whose content was already present in the store.
    pub objects_deduplicated: usize,
    /// Entries resolved to an external URL.
    pub redirected: usize,
    /// Total bytes hashed.
    pub bytes_hashed: u64,
}

/// How a processed candidate reached its location.
enum Publication {
    /// Bytes written to the store.
    Written,
    /// Identical content was already in the store.
    Deduplicated,
    /// Entry points at an external URL; nothing stored.
    Redirected,
}

struct Processed {
    entry: ManifestEntry,
    publication: Publication,
}

/// Hashes a source tree and publishes it into an object store.
///
/// One collector drives one build; the annotator and store it borrows
/// are immutable for the duration, so per-candidate work parallelizes
/// freely.
pub struct FileCollector<'a> {
    annotator: &'a EntryAnnotator,
    store: &'a ObjectStore,
    algorithm: HashAlgorithm,
    url_redirects: bool,
}

impl<'a> FileCollector<'a> {
    /// Create a collector publishing into `store`, classifying entries
    /// with `annotator`.
    pub fn new(annotator: &'a EntryAnnotator, store: &'a ObjectStore) -> Self {
        Self {
            annotator,
            store,
            algorithm: HashAlgorithm::default(),
            url_redirects: false,
        }
    }

    /// Select the content hash algorithm (builder pattern).
    pub fn with_algorithm(mut self, algorithm: HashAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Enable `.url.txt` redirect sidecars (builder pattern).
    pub fn with_url_redirects(mut self, enabled: bool) -> Self {
        self.url_redirects = enabled;
        self
    }

    /// Collect `source_root` into `manifest`.
    ///
    /// Walks the tree, drops sidecar files from the candidate list, and
    /// processes every remaining candidate in parallel. Entries for
    /// successful candidates are appended to `manifest.tasks` even when
    /// the pass as a whole fails, so a failed build still shows what
    /// was processed; callers wanting atomic semantics discard the
    /// manifest on error.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::Walk`] if the tree cannot be traversed,
    /// or [`BuildError::FilesFailed`] if any candidate failed after
    /// all of them were attempted.
    pub fn collect(
        &self,
        source_root: &Path,
        manifest: &mut Manifest,
    ) -> BuildResult<CollectStats> {
        let candidates: Vec<Candidate> = walk_tree(source_root)?
            .into_iter()
            .filter(|c| {
                c.path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .map(|name| !sidecar::is_sidecar(name))
                    .unwrap_or(false)
            })
            .collect();

        info!(
            candidates = candidates.len(),
            source = %source_root.display(),
            algorithm = %self.algorithm,
            "Collecting files"
        );

        let outcomes: Vec<io::Result<Processed>> = candidates
            .par_iter()
            .map(|candidate| self.process(candidate))
            .collect();

        let total = outcomes.len();
        let mut stats = CollectStats::default();
        let mut failed = 0usize;
        let mut targets = HashSet::new();

        for (candidate, outcome) in candidates.iter().zip(outcomes) {
            match outcome {
                Ok(processed) => {
                    if !targets.insert(processed.entry.to.clone()) {
                        // Which entry the installer applies is undefined.
                        warn!(to = %processed.entry.to, "Duplicate install target");
                    }
                    match processed.publication {
                        Publication::Written => stats.objects_written += 1,
                        Publication::Deduplicated => stats.objects_deduplicated += 1,
                        Publication::Redirected => stats.redirected += 1,
                    }
                    stats.bytes_hashed += processed.entry.size;
                    stats.entries += 1;
                    debug!(
                        to = %processed.entry.to,
                        hash = %processed.entry.hash,
                        "Collected file"
                    );
                    manifest.tasks.push(processed.entry);
                }
                Err(e) => {
                    error!(
                        file = %candidate.path.display(),
                        error = %e,
                        "Failed to process file"
                    );
                    failed += 1;
                }
            }
        }

        if failed > 0 {
            return Err(BuildError::FilesFailed { failed, total });
        }

        info!(
            entries = stats.entries,
            written = stats.objects_written,
            deduplicated = stats.objects_deduplicated,
            redirected = stats.redirected,
            "Collection complete"
        );
        Ok(stats)
    }

    /// Process one candidate: hash, resolve redirect, classify, and
    /// publish. Fully independent of every other candidate.
    fn process(&self, candidate: &Candidate) -> io::Result<Processed> {
        let size = fs::metadata(&candidate.path)?.len();
        let hash = self.algorithm.digest_file(&candidate.path)?;

        let redirect = if self.url_redirects {
            let sidecar_path = sidecar::url_sidecar_path(&candidate.path);
            if sidecar_path.exists() {
                Some(UrlRedirect::from_file(&sidecar_path)?)
            } else {
                None
            }
        } else {
            None
        };

        let (location, copy) = match &redirect {
            Some(redirect) => (redirect.url().to_string(), false),
            None => (ObjectStore::relative_location(&hash), true),
        };

        let mut entry = ManifestEntry {
            hash,
            location,
            to: candidate.relative.clone(),
            size,
            feature: None,
            user_file: None,
        };
        self.annotator.apply(&mut entry);

        let publication = if copy {
            if self.store.publish(&candidate.path, &entry.hash)? {
                Publication::Written
            } else {
                Publication::Deduplicated
            }
        } else {
            Publication::Redirected
        };

        Ok(Processed { entry, publication })
    }
}
