//! Loader manifests carried for the installer.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Loader-specific install data, keyed by loader identifier in the
/// manifest's `loaders` map.
///
/// The build core treats this as a mostly opaque payload: `version` is
/// surfaced for display and everything else is retained verbatim for
/// the installer collaborator, so loader formats can evolve without a
/// core change.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoaderManifest {
    /// Loader version, when the loader declares one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Remaining loader payload, passed through untouched.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}
