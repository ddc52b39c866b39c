//! Distribution build engine.
//!
//! Turns a source tree of mod/game files into a content-addressed
//! distribution: a populated object store plus a manifest of install
//! tasks an installer replays against a local game instance.
//!
//! # Build flow
//!
//! ```text
//! walker ──► candidates ──► collector (parallel hash + publish)
//!                               │
//!                  annotator (feature / user-file tagging)
//!                               │
//!                               ▼
//!                     manifest task list ──► saved JSON document
//! ```
//!
//! Configuration errors abort before any filesystem work; per-file
//! failures are aggregated into a single error after every candidate
//! has been attempted.

mod annotator;
mod collector;
mod config;
mod error;
mod patterns;
mod sidecar;
mod walker;

pub use annotator::EntryAnnotator;
pub use collector::{CollectStats, FileCollector};
pub use config::BuilderConfig;
pub use error::{BuildError, BuildResult};
pub use patterns::{FeaturePattern, PathPatternList};
pub use sidecar::{is_sidecar, url_sidecar_path, UrlRedirect, INFO_SUFFIX, URL_SUFFIX};
pub use walker::{
    classify_directory, walk_tree, walk_tree_with, Candidate, DirectoryBehavior,
    CLIENT_ONLY_DIR, OPTIONAL_DIR, SERVER_ONLY_DIR,
};

use std::path::PathBuf;

use tracing::info;

use crate::manifest::Manifest;
use crate::store::ObjectStore;

/// Options for one build invocation.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Root of the source tree to collect.
    pub source_dir: PathBuf,

    /// Object store root the build publishes into. Shared between
    /// distributions; identical content deduplicates across builds.
    pub objects_dir: PathBuf,

    /// Resolve `.url.txt` redirect sidecars.
    pub url_redirects: bool,
}

/// A successful build: the finalized manifest and its statistics.
#[derive(Debug)]
pub struct BuildOutcome {
    pub manifest: Manifest,
    pub stats: CollectStats,
}

/// One-shot build of a distribution from a source tree.
///
/// A builder runs to completion or fails as a whole; there is no
/// cancellation. On failure no manifest is returned, though objects
/// already published remain in the store (publishing is idempotent, so
/// a re-run converges).
pub struct PackBuilder {
    config: BuilderConfig,
    options: BuildOptions,
}

impl PackBuilder {
    /// Create a builder for `config` with the given invocation options.
    pub fn new(config: BuilderConfig, options: BuildOptions) -> Self {
        Self { config, options }
    }

    /// Run the build.
    ///
    /// # Errors
    ///
    /// - [`BuildError::Config`] before any filesystem work when the
    ///   definition is invalid.
    /// - [`BuildError::Walk`] when the source tree cannot be traversed.
    /// - [`BuildError::FilesFailed`] when any candidate failed; every
    ///   candidate is still attempted first.
    pub fn build(&self) -> BuildResult<BuildOutcome> {
        let mut annotator = EntryAnnotator::new();
        self.config.register_properties(&mut annotator)?;

        let mut manifest = Manifest::new();
        self.config.update_manifest(&mut manifest);

        let store = ObjectStore::new(&self.options.objects_dir);
        let collector = FileCollector::new(&annotator, &store)
            .with_algorithm(self.config.hash_algorithm())
            .with_url_redirects(self.options.url_redirects);

        let stats = collector.collect(&self.options.source_dir, &mut manifest)?;
        manifest.features = annotator.features_in_use(&manifest.tasks);

        info!(
            entries = stats.entries,
            features = manifest.features.len(),
            "Build complete"
        );
        Ok(BuildOutcome { manifest, stats })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::MIN_PROTOCOL_VERSION;
    use std::fs::{self, File};
    use std::io::Write;
    use tempfile::TempDir;

    struct Fixture {
        temp: TempDir,
    }

    impl Fixture {
        fn new() -> Self {
            let temp = TempDir::new().unwrap();
            fs::create_dir_all(temp.path().join("src")).unwrap();
            Self { temp }
        }

        fn write_source(&self, relative: &str, content: &[u8]) {
            let path = self.temp.path().join("src").join(relative);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            let mut file = File::create(path).unwrap();
            file.write_all(content).unwrap();
        }

        fn options(&self) -> BuildOptions {
            BuildOptions {
                source_dir: self.temp.path().join("src"),
                objects_dir: self.temp.path().join("objects"),
                url_redirects: false,
            }
        }
    }

    fn config_with_feature() -> BuilderConfig {
        serde_json::from_str(
            r#"{
                "name": "mypack",
                "title": "My Pack",
                "features": [
                    {"feature": {"name": "shaders", "recommended": true},
                     "filePatterns": {"include": ["shaderpacks/*"]}},
                    {"feature": {"name": "unused"},
                     "filePatterns": {"include": ["never/*"]}}
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_build_produces_manifest() {
        let fixture = Fixture::new();
        fixture.write_source("mods/foo.jar", b"mod bytes");
        fixture.write_source("shaderpacks/fancy.zip", b"shader bytes");

        let builder = PackBuilder::new(config_with_feature(), fixture.options());
        let outcome = builder.build().unwrap();

        assert_eq!(outcome.manifest.minimum_version, MIN_PROTOCOL_VERSION);
        assert_eq!(outcome.manifest.name.as_deref(), Some("mypack"));
        assert_eq!(outcome.manifest.tasks.len(), 2);
        assert_eq!(outcome.stats.entries, 2);
    }

    #[test]
    fn test_build_stamps_only_features_in_use() {
        let fixture = Fixture::new();
        fixture.write_source("shaderpacks/fancy.zip", b"shader bytes");

        let builder = PackBuilder::new(config_with_feature(), fixture.options());
        let outcome = builder.build().unwrap();

        let names: Vec<&str> = outcome
            .manifest
            .features
            .iter()
            .map(|f| f.name.as_str())
            .collect();
        assert_eq!(names, vec!["shaders"]);
    }

    #[test]
    fn test_build_config_error_fails_before_filesystem_work() {
        let fixture = Fixture::new();
        fixture.write_source("mods/foo.jar", b"mod bytes");

        let config: BuilderConfig =
            serde_json::from_str(r#"{"features": [{"feature": {"name": ""}}]}"#).unwrap();
        let options = fixture.options();
        let objects_dir = options.objects_dir.clone();

        let result = PackBuilder::new(config, options).build();

        assert!(matches!(result, Err(BuildError::Config(_))));
        // Fail fast: the store was never created.
        assert!(!objects_dir.exists());
    }

    #[test]
    fn test_build_empty_source() {
        let fixture = Fixture::new();
        let builder = PackBuilder::new(BuilderConfig::default(), fixture.options());
        let outcome = builder.build().unwrap();

        assert!(outcome.manifest.tasks.is_empty());
        assert!(outcome.manifest.features.is_empty());
    }
}
