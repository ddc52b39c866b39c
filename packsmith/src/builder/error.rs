//! Error types for the build engine.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for build operations.
pub type BuildResult<T> = Result<T, BuildError>;

/// Errors raised by the build engine.
///
/// Per-file I/O problems are deliberately not represented here: the
/// pipeline logs them, keeps processing the remaining candidates, and
/// reports a single [`BuildError::FilesFailed`] once every candidate
/// has been attempted.
#[derive(Debug, Error)]
pub enum BuildError {
    /// The build configuration is invalid. Raised before any hashing
    /// work starts; the filesystem has not been touched.
    #[error("invalid build configuration: {0}")]
    Config(String),

    /// The source tree could not be traversed.
    #[error("failed to walk {path}: {source}")]
    Walk { path: PathBuf, source: io::Error },

    /// One or more candidates failed during hashing or publication.
    /// Entries for the candidates that succeeded have still been
    /// collected; the log carries the per-file specifics.
    #[error("{failed} of {total} files failed to process; see the log for details")]
    FilesFailed { failed: usize, total: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_display() {
        let err = BuildError::Config("empty feature name".to_string());
        assert!(err.to_string().contains("empty feature name"));
        assert!(err.to_string().contains("configuration"));
    }

    #[test]
    fn test_files_failed_display_counts() {
        let err = BuildError::FilesFailed {
            failed: 3,
            total: 10,
        };
        let msg = err.to_string();
        assert!(msg.contains("3 of 10"));
        assert!(msg.contains("log"));
    }

    #[test]
    fn test_walk_carries_source() {
        use std::error::Error;

        let err = BuildError::Walk {
            path: PathBuf::from("/src"),
            source: io::Error::new(io::ErrorKind::NotFound, "gone"),
        };
        assert!(err.source().is_some());
    }
}
