//! CLI error type.

use std::fmt;
use std::io;
use std::path::PathBuf;

use packsmith::builder::BuildError;
use packsmith::manifest::ManifestError;

/// Errors surfaced to the terminal.
#[derive(Debug)]
pub enum CliError {
    /// The build itself failed.
    Build(BuildError),

    /// The manifest document could not be written.
    Manifest(ManifestError),

    /// A filesystem operation outside the build failed.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Build(e) => write!(f, "{}", e),
            CliError::Manifest(e) => write!(f, "{}", e),
            CliError::Io { path, source } => {
                write!(f, "failed to access {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Build(e) => Some(e),
            CliError::Manifest(e) => Some(e),
            CliError::Io { source, .. } => Some(source),
        }
    }
}

impl From<BuildError> for CliError {
    fn from(e: BuildError) -> Self {
        CliError::Build(e)
    }
}

impl From<ManifestError> for CliError {
    fn from(e: ManifestError) -> Self {
        CliError::Manifest(e)
    }
}
