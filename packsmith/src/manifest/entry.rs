//! File install tasks.

use serde::{Deserialize, Serialize};

/// One file's install task within a manifest.
///
/// `location` is either a store-relative object path derived from
/// `hash` (`hash[0:2]/hash[2:4]/hash`) or an external URL; the two are
/// mutually exclusive, and a URL entry has no physical copy in the
/// object store.
///
/// `to` must be unique across all entries of one manifest. The behavior
/// when two entries target the same path is undefined and the installer
/// may apply either.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestEntry {
    /// Hex digest of the file content.
    pub hash: String,

    /// Where the installer fetches the bytes from; resolved against the
    /// distribution's objects URL unless it is an absolute URL.
    pub location: String,

    /// Install target path relative to the instance root, forward-slash
    /// separated.
    pub to: String,

    /// File size in bytes.
    pub size: u64,

    /// Feature this entry belongs to. Entries without a feature are
    /// always installed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature: Option<String>,

    /// Marks a file whose locally modified copy must be preserved
    /// across updates instead of being silently overwritten.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_file: Option<bool>,
}

impl ManifestEntry {
    /// Whether this entry's location is an external URL rather than a
    /// store-relative object path.
    pub fn is_external(&self) -> bool {
        self.location.starts_with("http://") || self.location.starts_with("https://")
    }

    /// Whether the installer must preserve a locally modified copy.
    pub fn is_user_file(&self) -> bool {
        self.user_file.unwrap_or(false)
    }
}
