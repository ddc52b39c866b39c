//! Builder configuration: the modpack definition file.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::annotator::EntryAnnotator;
use super::error::{BuildError, BuildResult};
use super::patterns::{FeaturePattern, PathPatternList};
use crate::hash::HashAlgorithm;
use crate::manifest::{LaunchModifier, Manifest};

/// The modpack definition, read from the pack's JSON config file.
///
/// Every field is optional in the file, so a minimal `{}` definition
/// builds a pack with defaults. This table is the only policy surface
/// exposed to build configuration besides the fixed directory
/// classification rules.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BuilderConfig {
    /// Machine-readable pack name.
    pub name: Option<String>,

    /// Human-readable pack title.
    pub title: Option<String>,

    /// Game version the pack targets.
    pub game_version: Option<String>,

    /// Launch adjustments shipped with the pack.
    #[serde(rename = "launch")]
    pub launch_modifier: LaunchModifier,

    /// Feature patterns, applied to entries in declaration order.
    pub features: Vec<FeaturePattern>,

    /// Files whose local edits the installer must preserve.
    pub user_files: PathPatternList,

    /// Default JVM arguments a settings layer may override.
    #[serde(rename = "defaultJVMArguments")]
    pub default_jvm_arguments: Option<String>,

    /// Default heap allocation in megabytes.
    pub default_heap_allocation: Option<u32>,

    /// Whether the pack is a preview release.
    pub is_preview: bool,

    /// Content hash algorithm; defaults to SHA-1, the addressing
    /// scheme of existing stores.
    pub hash: Option<HashAlgorithm>,
}

impl BuilderConfig {
    /// Load a definition from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::Config`] when the file cannot be read or
    /// is not a valid definition.
    pub fn load(path: &Path) -> BuildResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            BuildError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        serde_json::from_str(&content).map_err(|e| {
            BuildError::Config(format!("invalid definition {}: {}", path.display(), e))
        })
    }

    /// Hash algorithm for this build.
    pub fn hash_algorithm(&self) -> HashAlgorithm {
        self.hash.unwrap_or_default()
    }

    /// Stamp pack metadata into `manifest`.
    ///
    /// Name, title, and game version only overwrite when present; the
    /// launch block, JVM defaults, and preview flag are always applied.
    /// A configured heap allocation is clamped to at least 1 MB.
    pub fn update_manifest(&self, manifest: &mut Manifest) {
        manifest.update_name(self.name.as_deref());
        manifest.update_title(self.title.as_deref());
        manifest.update_game_version(self.game_version.as_deref());
        manifest.launch_modifier = self.launch_modifier.clone();
        manifest.default_jvm_arguments =
            self.default_jvm_arguments.clone().unwrap_or_default();
        manifest.default_heap_allocation =
            self.default_heap_allocation.map(|mb| mb.max(1)).unwrap_or(0);
        manifest.is_preview = self.is_preview;
    }

    /// Register feature patterns and the user-file list with
    /// `annotator`.
    ///
    /// # Errors
    ///
    /// Any invalid pattern aborts the whole build here, before the
    /// pipeline touches the filesystem.
    pub fn register_properties(&self, annotator: &mut EntryAnnotator) -> BuildResult<()> {
        for pattern in &self.features {
            annotator.register(pattern.clone())?;
        }
        annotator.set_user_files(self.user_files.clone())
    }
}
