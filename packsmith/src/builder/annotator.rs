//! Per-entry feature and user-file classification.

use std::collections::HashSet;

use tracing::debug;

use super::error::{BuildError, BuildResult};
use super::patterns::{FeaturePattern, PathPatternList};
use crate::manifest::{Feature, ManifestEntry};

/// Applies feature membership and user-file preservation rules to
/// manifest entries.
///
/// All patterns are registered up front; registration is where
/// configuration errors surface, before any hashing work. After
/// registration the annotator is immutable, so [`apply`](Self::apply)
/// is safe to call from parallel workers. Feature patterns match in
/// registration order and the first match wins.
#[derive(Debug, Default)]
pub struct EntryAnnotator {
    features: Vec<FeaturePattern>,
    user_files: PathPatternList,
}

impl EntryAnnotator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a feature pattern.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::Config`] when the pattern references an
    /// empty feature name or carries a malformed glob. Both abort the
    /// whole build before the pipeline starts.
    pub fn register(&mut self, pattern: FeaturePattern) -> BuildResult<()> {
        if pattern.feature.name.trim().is_empty() {
            return Err(BuildError::Config(
                "feature pattern with empty feature name".to_string(),
            ));
        }
        pattern.file_patterns.validate().map_err(|e| {
            BuildError::Config(format!("feature {:?}: {}", pattern.feature.name, e))
        })?;

        debug!(feature = %pattern.feature.name, "Registered feature pattern");
        self.features.push(pattern);
        Ok(())
    }

    /// Install the user-file preservation list.
    pub fn set_user_files(&mut self, patterns: PathPatternList) -> BuildResult<()> {
        patterns
            .validate()
            .map_err(|e| BuildError::Config(format!("user files: {}", e)))?;
        self.user_files = patterns;
        Ok(())
    }

    /// Tag `entry` with its feature membership and user-file mark.
    pub fn apply(&self, entry: &mut ManifestEntry) {
        if let Some(pattern) = self
            .features
            .iter()
            .find(|p| p.file_patterns.matches(&entry.to))
        {
            entry.feature = Some(pattern.feature.name.clone());
        }

        if self.user_files.matches(&entry.to) {
            entry.user_file = Some(true);
        }
    }

    /// Features referenced by at least one of `tasks`, in registration
    /// order, without duplicates.
    pub fn features_in_use(&self, tasks: &[ManifestEntry]) -> Vec<Feature> {
        let used: HashSet<&str> = tasks
            .iter()
            .filter_map(|t| t.feature.as_deref())
            .collect();

        let mut seen = HashSet::new();
        self.features
            .iter()
            .filter(|p| used.contains(p.feature.name.as_str()))
            .filter(|p| seen.insert(p.feature.name.clone()))
            .map(|p| p.feature.clone())
            .collect()
    }
}
