//! Distribution manifest data model.
//!
//! A [`Manifest`] is the serializable description of one distribution:
//! its identity, launch defaults, optional features, loader payloads,
//! and above all the `tasks` list: one [`ManifestEntry`] per file the
//! installer must place into a local game instance. The builder
//! populates a fresh manifest per build invocation; the installer and
//! launcher collaborators consume the saved JSON document.
//!
//! Wire format is camelCase JSON. Field names are part of the protocol
//! shared with the installer and must not drift.

mod entry;
mod feature;
mod launch;
mod loader;

pub use entry::ManifestEntry;
pub use feature::Feature;
pub use launch::LaunchModifier;
pub use loader::LoaderManifest;

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Oldest manifest protocol version installers must understand.
///
/// Stamped into every manifest; an installer refuses documents whose
/// `minimumVersion` exceeds what it implements.
pub const MIN_PROTOCOL_VERSION: u32 = 5;

/// Splash screen messages the launcher dismisses when a manifest does
/// not configure its own list.
pub const DEFAULT_SPLASH_DISMISSALS: &str = "OpenGL Vendor\nLWJGL Version\nEARLYDISPLAY";

/// Result type for manifest persistence.
pub type ManifestResult<T> = Result<T, ManifestError>;

/// Errors raised while loading or saving a manifest document.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// Failed to read the manifest file.
    #[error("failed to read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },

    /// Failed to write the manifest file.
    #[error("failed to write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },

    /// The document is not valid manifest JSON.
    #[error("invalid manifest {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// The manifest could not be serialized.
    #[error("failed to serialize manifest: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// The serializable description of a distribution.
///
/// Constructed fresh per build invocation. The manifest exclusively
/// owns its `tasks` and `features` lists for the duration of a build;
/// both are considered final only once the build as a whole reports
/// success.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Manifest {
    /// Protocol compatibility floor for installers.
    pub minimum_version: u32,

    /// Machine-readable pack name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Human-readable pack title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Pack version string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Base URL the distribution is served from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Location of game libraries, relative to `base_url`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub libraries_location: Option<String>,

    /// Location of the object store, relative to `base_url`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub objects_location: Option<String>,

    /// Game version this pack targets.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game_version: Option<String>,

    /// Launch adjustments applied when starting the game.
    #[serde(rename = "launch", skip_serializing_if = "LaunchModifier::is_empty")]
    pub launch_modifier: LaunchModifier,

    /// Optional features referenced by tasks, in declaration order.
    pub features: Vec<Feature>,

    /// File install tasks. Append-only during a build, immutable
    /// afterward.
    pub tasks: Vec<ManifestEntry>,

    /// Loader install payloads keyed by loader identifier.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub loaders: BTreeMap<String, LoaderManifest>,

    /// Default heap allocation in megabytes; `0` leaves the choice to
    /// the launcher.
    pub default_heap_allocation: u32,

    /// Default JVM arguments a settings layer may override.
    #[serde(rename = "defaultJVMArguments")]
    pub default_jvm_arguments: String,

    /// Splash screen dismissal list; `None` falls back to
    /// [`DEFAULT_SPLASH_DISMISSALS`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub splash_screen_dismissals: Option<String>,

    /// Whether this distribution is a preview release.
    pub is_preview: bool,
}

impl Manifest {
    /// Create an empty manifest stamped with the current protocol
    /// version.
    pub fn new() -> Self {
        Self {
            minimum_version: MIN_PROTOCOL_VERSION,
            name: None,
            title: None,
            version: None,
            base_url: None,
            libraries_location: None,
            objects_location: None,
            game_version: None,
            launch_modifier: LaunchModifier::default(),
            features: Vec::new(),
            tasks: Vec::new(),
            loaders: BTreeMap::new(),
            default_heap_allocation: 0,
            default_jvm_arguments: String::new(),
            splash_screen_dismissals: None,
            is_preview: false,
        }
    }

    /// Set the pack name, leaving the current value in place when
    /// `name` is absent.
    pub fn update_name(&mut self, name: Option<&str>) {
        if let Some(name) = name {
            self.name = Some(name.to_string());
        }
    }

    /// Set the pack title, leaving the current value in place when
    /// `title` is absent.
    pub fn update_title(&mut self, title: Option<&str>) {
        if let Some(title) = title {
            self.title = Some(title.to_string());
        }
    }

    /// Set the game version, leaving the current value in place when
    /// `game_version` is absent.
    pub fn update_game_version(&mut self, game_version: Option<&str>) {
        if let Some(game_version) = game_version {
            self.game_version = Some(game_version.to_string());
        }
    }

    /// Set the pack version, leaving the current value in place when
    /// `version` is absent.
    pub fn update_version(&mut self, version: Option<&str>) {
        if let Some(version) = version {
            self.version = Some(version.to_string());
        }
    }

    /// Splash screen dismissal list, falling back to the default.
    pub fn splash_screen_dismissals(&self) -> &str {
        self.splash_screen_dismissals
            .as_deref()
            .unwrap_or(DEFAULT_SPLASH_DISMISSALS)
    }

    /// Absolute URL the installer fetches store objects from.
    ///
    /// `None` until a base URL is set. Without an objects location the
    /// base URL itself is the objects root.
    pub fn objects_url(&self) -> Option<String> {
        let base = self.base_url.as_deref()?;
        match self.objects_location.as_deref().filter(|l| !l.is_empty()) {
            Some(location) => Some(join_url(base, location)),
            None => Some(base.to_string()),
        }
    }

    /// Absolute URL the installer fetches game libraries from, when a
    /// libraries location is configured.
    pub fn libraries_url(&self) -> Option<String> {
        let base = self.base_url.as_deref()?;
        let location = self.libraries_location.as_deref().filter(|l| !l.is_empty())?;
        Some(join_url(base, location))
    }

    /// Save the manifest as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> ManifestResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|e| ManifestError::Write {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Load a manifest from a JSON document.
    pub fn load(path: &Path) -> ManifestResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| ManifestError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        serde_json::from_str(&content).map_err(|e| ManifestError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

impl Default for Manifest {
    fn default() -> Self {
        Self::new()
    }
}

/// Join a base URL and a location with exactly one slash and a trailing
/// slash, so installers can append object paths directly.
fn join_url(base: &str, segment: &str) -> String {
    format!(
        "{}/{}/",
        base.trim_end_matches('/'),
        segment.trim_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn entry(to: &str) -> ManifestEntry {
        ManifestEntry {
            hash: "2aae6c35c94fcfb415dbe95f408b9ce91ee846ed".to_string(),
            location: "2a/ae/2aae6c35c94fcfb415dbe95f408b9ce91ee846ed".to_string(),
            to: to.to_string(),
            size: 11,
            feature: None,
            user_file: None,
        }
    }

    #[test]
    fn test_new_stamps_protocol_version() {
        assert_eq!(Manifest::new().minimum_version, MIN_PROTOCOL_VERSION);
    }

    #[test]
    fn test_update_name_only_when_present() {
        let mut manifest = Manifest::new();
        manifest.update_name(Some("mypack"));
        manifest.update_name(None);
        assert_eq!(manifest.name.as_deref(), Some("mypack"));
    }

    #[test]
    fn test_update_title_and_game_version() {
        let mut manifest = Manifest::new();
        manifest.update_title(Some("My Pack"));
        manifest.update_game_version(Some("1.20.1"));
        manifest.update_title(None);
        manifest.update_game_version(None);

        assert_eq!(manifest.title.as_deref(), Some("My Pack"));
        assert_eq!(manifest.game_version.as_deref(), Some("1.20.1"));
    }

    #[test]
    fn test_splash_dismissals_default() {
        let mut manifest = Manifest::new();
        assert_eq!(
            manifest.splash_screen_dismissals(),
            DEFAULT_SPLASH_DISMISSALS
        );

        manifest.splash_screen_dismissals = Some("CUSTOM".to_string());
        assert_eq!(manifest.splash_screen_dismissals(), "CUSTOM");
    }

    #[test]
    fn test_objects_url_requires_base() {
        let manifest = Manifest::new();
        assert!(manifest.objects_url().is_none());
    }

    #[test]
    fn test_objects_url_joins_location() {
        let mut manifest = Manifest::new();
        manifest.base_url = Some("https://dist.example.com/pack".to_string());
        manifest.objects_location = Some("objects".to_string());

        assert_eq!(
            manifest.objects_url().as_deref(),
            Some("https://dist.example.com/pack/objects/")
        );
    }

    #[test]
    fn test_objects_url_falls_back_to_base() {
        let mut manifest = Manifest::new();
        manifest.base_url = Some("https://dist.example.com/pack/".to_string());

        assert_eq!(
            manifest.objects_url().as_deref(),
            Some("https://dist.example.com/pack/")
        );
    }

    #[test]
    fn test_libraries_url_requires_location() {
        let mut manifest = Manifest::new();
        manifest.base_url = Some("https://dist.example.com".to_string());
        assert!(manifest.libraries_url().is_none());

        manifest.libraries_location = Some("libraries".to_string());
        assert_eq!(
            manifest.libraries_url().as_deref(),
            Some("https://dist.example.com/libraries/")
        );
    }

    #[test]
    fn test_serde_wire_field_names() {
        let mut manifest = Manifest::new();
        manifest.name = Some("mypack".to_string());
        manifest.launch_modifier = LaunchModifier::with_flags(vec!["-Xss4M".to_string()]);
        let json = serde_json::to_string(&manifest).unwrap();

        assert!(json.contains("\"minimumVersion\":5"));
        assert!(json.contains("\"defaultJVMArguments\""));
        assert!(json.contains("\"defaultHeapAllocation\""));
        assert!(json.contains("\"isPreview\""));
        assert!(json.contains("\"launch\""));
        assert!(!json.contains("launchModifier"));
    }

    #[test]
    fn test_serde_round_trip() {
        let mut manifest = Manifest::new();
        manifest.name = Some("mypack".to_string());
        manifest.base_url = Some("https://dist.example.com".to_string());
        manifest.tasks.push(entry("mods/foo.jar"));
        manifest.features.push(Feature::new("shaders"));
        manifest
            .loaders
            .insert("fabric".to_string(), LoaderManifest::default());

        let json = serde_json::to_string(&manifest).unwrap();
        let parsed: Manifest = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, manifest);
    }

    #[test]
    fn test_save_and_load() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("manifest.json");

        let mut manifest = Manifest::new();
        manifest.name = Some("mypack".to_string());
        manifest.tasks.push(entry("config/settings.cfg"));
        manifest.save(&path).unwrap();

        let loaded = Manifest::load(&path).unwrap();
        assert_eq!(loaded, manifest);
    }

    #[test]
    fn test_load_rejects_invalid_json() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            Manifest::load(&path),
            Err(ManifestError::Parse { .. })
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let temp = TempDir::new().unwrap();
        assert!(matches!(
            Manifest::load(&temp.path().join("absent.json")),
            Err(ManifestError::Read { .. })
        ));
    }
}
