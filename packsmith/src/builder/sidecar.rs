//! Sidecar files that override a candidate's publication.
//!
//! A sidecar sits next to its candidate and carries metadata for it;
//! sidecars themselves are never published. Two suffixes are reserved:
//!
//! - `<name>.url.txt` redirects the candidate's download location to an
//!   external URL, so the file is served from elsewhere and never
//!   copied into the object store.
//! - `<name>.info.json` is reserved for per-file metadata overrides; it
//!   is recognized and excluded from publication even though the build
//!   core does not consume its payload yet.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Suffix of URL-redirect sidecars.
pub const URL_SUFFIX: &str = ".url.txt";

/// Suffix of per-file metadata override sidecars.
pub const INFO_SUFFIX: &str = ".info.json";

/// Whether `name` is a sidecar for another candidate.
pub fn is_sidecar(name: &str) -> bool {
    name.ends_with(URL_SUFFIX) || name.ends_with(INFO_SUFFIX)
}

/// Path of the URL-redirect sidecar belonging to `file`.
pub fn url_sidecar_path(file: &Path) -> PathBuf {
    let mut name = file
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(URL_SUFFIX);
    file.with_file_name(name)
}

/// A parsed URL-redirect sidecar.
///
/// The sidecar's first non-blank line is the external URL the installer
/// downloads the candidate from instead of the object store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlRedirect {
    url: String,
}

impl UrlRedirect {
    /// Read and validate a redirect sidecar.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, contains no URL, or
    /// the URL is not `http(s)`. These count as per-candidate failures
    /// and are aggregated, not fatal.
    pub fn from_file(path: &Path) -> io::Result<Self> {
        let content = fs::read_to_string(path)?;
        let url = content
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("redirect sidecar {} is empty", path.display()),
                )
            })?;

        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "redirect sidecar {} does not contain an http(s) URL: {}",
                    path.display(),
                    url
                ),
            ));
        }

        Ok(Self {
            url: url.to_string(),
        })
    }

    /// The redirect target URL.
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_is_sidecar() {
        assert!(is_sidecar("foo.jar.url.txt"));
        assert!(is_sidecar("foo.jar.info.json"));
        assert!(!is_sidecar("foo.jar"));
        assert!(!is_sidecar("url.txt.jar"));
    }

    #[test]
    fn test_url_sidecar_path() {
        let path = url_sidecar_path(Path::new("/src/mods/foo.jar"));
        assert_eq!(path, Path::new("/src/mods/foo.jar.url.txt"));
    }

    #[test]
    fn test_from_file_reads_first_line() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("foo.jar.url.txt");
        fs::write(&path, "\n  https://example.com/foo.jar  \nignored\n").unwrap();

        let redirect = UrlRedirect::from_file(&path).unwrap();
        assert_eq!(redirect.url(), "https://example.com/foo.jar");
    }

    #[test]
    fn test_from_file_rejects_empty() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("foo.jar.url.txt");
        fs::write(&path, "\n   \n").unwrap();

        let err = UrlRedirect::from_file(&path).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_from_file_rejects_non_http() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("foo.jar.url.txt");
        fs::write(&path, "ftp://example.com/foo.jar").unwrap();

        let err = UrlRedirect::from_file(&path).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_from_file_missing() {
        let temp = TempDir::new().unwrap();
        assert!(UrlRedirect::from_file(&temp.path().join("absent.url.txt")).is_err());
    }
}
