//! Launch defaults stamped into the manifest.

use serde::{Deserialize, Serialize};

/// Launch adjustments a distribution ships with.
///
/// The build core only records this block; the launcher collaborator
/// merges it into the instance's launch configuration, where a settings
/// layer may override it per instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LaunchModifier {
    /// Extra process flags appended to the launch command.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub flags: Vec<String>,
}

impl LaunchModifier {
    /// A modifier carrying the given flags.
    pub fn with_flags(flags: Vec<String>) -> Self {
        Self { flags }
    }

    /// Whether this modifier changes anything.
    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }
}
