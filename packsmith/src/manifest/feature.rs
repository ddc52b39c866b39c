//! User-toggleable optional content units.

use serde::{Deserialize, Serialize};

/// A named, user-toggleable unit of optional content, e.g. an optional
/// mod.
///
/// The installer surfaces features as checkboxes before installing;
/// entries tagged with a feature are only fetched when the user enables
/// it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feature {
    /// Unique feature name referenced by manifest entries.
    pub name: String,

    /// Human-readable description shown alongside the checkbox.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Whether the installer pre-selects this feature.
    #[serde(default)]
    pub recommended: bool,
}

impl Feature {
    /// Create a feature with the given name, not recommended, without a
    /// description.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            recommended: false,
        }
    }

    /// Set the description (builder pattern).
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the recommended flag (builder pattern).
    pub fn with_recommended(mut self, recommended: bool) -> Self {
        self.recommended = recommended;
        self
    }
}
