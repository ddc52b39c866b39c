//! Path-matching predicates for feature gating and user files.

use glob::Pattern;
use serde::{Deserialize, Serialize};

use crate::manifest::Feature;

/// An include/exclude list of glob patterns matched against
/// forward-slash install paths.
///
/// A path matches when any include pattern matches and no exclude
/// pattern does. Wildcards cross directory separators, so `config/*`
/// also covers nested files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PathPatternList {
    pub include: Vec<String>,
    pub exclude: Vec<String>,
}

impl PathPatternList {
    /// A list matching the given include patterns.
    pub fn of(include: Vec<String>) -> Self {
        Self {
            include,
            exclude: Vec::new(),
        }
    }

    /// Whether the list has no patterns at all.
    pub fn is_empty(&self) -> bool {
        self.include.is_empty() && self.exclude.is_empty()
    }

    /// Check every pattern for glob syntax errors.
    ///
    /// Used at registration time so a malformed pattern fails the build
    /// before any hashing work, not silently at match time.
    pub fn validate(&self) -> Result<(), String> {
        for pattern in self.include.iter().chain(&self.exclude) {
            Pattern::new(pattern).map_err(|e| format!("invalid pattern {:?}: {}", pattern, e))?;
        }
        Ok(())
    }

    /// Test a forward-slash path against the list.
    pub fn matches(&self, path: &str) -> bool {
        if any_match(&self.exclude, path) {
            return false;
        }
        any_match(&self.include, path)
    }
}

fn any_match(patterns: &[String], path: &str) -> bool {
    patterns
        .iter()
        .any(|p| Pattern::new(p).map(|pat| pat.matches(path)).unwrap_or(false))
}

/// Binds a path predicate to a feature: entries whose install path
/// matches are tagged as belonging to that feature and become optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeaturePattern {
    /// The feature declared by this pattern.
    pub feature: Feature,

    /// Paths belonging to the feature.
    #[serde(default)]
    pub file_patterns: PathPatternList,
}

impl FeaturePattern {
    /// Create a pattern binding `patterns` to `feature`.
    pub fn new(feature: Feature, file_patterns: PathPatternList) -> Self {
        Self {
            feature,
            file_patterns,
        }
    }
}
