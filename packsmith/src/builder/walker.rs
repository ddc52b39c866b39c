//! Source tree traversal and directory classification.
//!
//! The walker enumerates every regular file beneath a source root,
//! classifying each directory name against a small reserved-name
//! policy table. Classification is per path segment:
//!
//! - [`DirectoryBehavior::Skip`] excludes the directory entirely
//!   (hidden directories, server-only content).
//! - [`DirectoryBehavior::Ignore`] descends but drops the name segment
//!   from relative paths, so the contents appear to live directly in
//!   the parent (transparent overlay for client-only and optional
//!   content).
//! - [`DirectoryBehavior::Continue`] is normal inclusion.
//!
//! Output order is not significant; downstream processing is parallel.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{trace, warn};

use super::error::{BuildError, BuildResult};

/// Reserved directory whose contents are server-side only and never
/// distributed to clients.
pub const SERVER_ONLY_DIR: &str = "_SERVER";

/// Reserved overlay directory for client-only content.
pub const CLIENT_ONLY_DIR: &str = "_CLIENT";

/// Reserved overlay directory for optional content.
pub const OPTIONAL_DIR: &str = "_OPTIONAL";

/// What traversal does with a directory, decided per path segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectoryBehavior {
    /// Exclude the directory and everything beneath it.
    Skip,
    /// Descend, but drop this name segment from relative paths.
    Ignore,
    /// Keep the segment and keep walking.
    Continue,
}

/// Classify a directory name against the reserved-name policy table.
///
/// Dot-prefixed names and [`SERVER_ONLY_DIR`] are excluded entirely;
/// [`CLIENT_ONLY_DIR`] and [`OPTIONAL_DIR`] are transparent overlays.
/// Everything else is included as-is.
pub fn classify_directory(name: &str) -> DirectoryBehavior {
    if name.starts_with('.') {
        DirectoryBehavior::Skip
    } else if name == SERVER_ONLY_DIR {
        DirectoryBehavior::Skip
    } else if name == CLIENT_ONLY_DIR || name == OPTIONAL_DIR {
        DirectoryBehavior::Ignore
    } else {
        DirectoryBehavior::Continue
    }
}

/// A regular file selected by traversal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Absolute path of the source file.
    pub path: PathBuf,
    /// Effective install path, forward-slash separated, with ignored
    /// directory segments removed.
    pub relative: String,
}

/// Walk `root` with the default reserved-name policy.
pub fn walk_tree(root: &Path) -> BuildResult<Vec<Candidate>> {
    walk_tree_with(root, classify_directory)
}

/// Walk `root`, classifying each directory name with `classify`.
///
/// Handles arbitrarily deep nesting. Symbolic links to files are
/// followed only when their canonical target stays inside the root;
/// links to directories and links that leave the root (or cannot be
/// resolved) are skipped with a warning, so traversal never escapes
/// the source tree.
pub fn walk_tree_with<F>(root: &Path, classify: F) -> BuildResult<Vec<Candidate>>
where
    F: Fn(&str) -> DirectoryBehavior,
{
    let canonical_root = root.canonicalize().map_err(|e| BuildError::Walk {
        path: root.to_path_buf(),
        source: e,
    })?;

    let mut candidates = Vec::new();
    walk_dir(&canonical_root, &canonical_root, "", &classify, &mut candidates)?;
    Ok(candidates)
}

fn walk_dir<F>(
    root: &Path,
    dir: &Path,
    prefix: &str,
    classify: &F,
    out: &mut Vec<Candidate>,
) -> BuildResult<()>
where
    F: Fn(&str) -> DirectoryBehavior,
{
    let entries = fs::read_dir(dir).map_err(|e| BuildError::Walk {
        path: dir.to_path_buf(),
        source: e,
    })?;

    for entry in entries {
        let entry = entry.map_err(|e| BuildError::Walk {
            path: dir.to_path_buf(),
            source: e,
        })?;
        let path = entry.path();

        let name = match path.file_name().and_then(|n| n.to_str()) {
            Some(name) => name.to_string(),
            None => {
                warn!(path = %path.display(), "Skipping entry with non-UTF-8 name");
                continue;
            }
        };

        let file_type = entry.file_type().map_err(|e| BuildError::Walk {
            path: path.clone(),
            source: e,
        })?;

        if file_type.is_symlink() {
            match path.canonicalize() {
                Ok(target) if !target.starts_with(root) => {
                    warn!(path = %path.display(), "Skipping symlink leaving the source root");
                    continue;
                }
                Ok(target) if target.is_dir() => {
                    warn!(path = %path.display(), "Skipping symlink to directory");
                    continue;
                }
                Ok(_) => {}
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Skipping unresolvable symlink");
                    continue;
                }
            }
        }

        if path.is_dir() {
            match classify(&name) {
                DirectoryBehavior::Skip => {
                    trace!(path = %path.display(), "Skipping directory");
                }
                DirectoryBehavior::Ignore => {
                    walk_dir(root, &path, prefix, classify, out)?;
                }
                DirectoryBehavior::Continue => {
                    let child_prefix = join_segment(prefix, &name);
                    walk_dir(root, &path, &child_prefix, classify, out)?;
                }
            }
        } else if path.is_file() {
            out.push(Candidate {
                relative: join_segment(prefix, &name),
                path,
            });
        }
    }

    Ok(())
}

fn join_segment(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", prefix, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        let mut file = File::create(path).unwrap();
        file.write_all(b"content").unwrap();
    }

    fn relatives(root: &Path) -> Vec<String> {
        let mut paths: Vec<String> = walk_tree(root)
            .unwrap()
            .into_iter()
            .map(|c| c.relative)
            .collect();
        paths.sort();
        paths
    }

    #[test]
    fn test_classify_dot_prefixed() {
        assert_eq!(classify_directory(".git"), DirectoryBehavior::Skip);
        assert_eq!(classify_directory(".hidden"), DirectoryBehavior::Skip);
    }

    #[test]
    fn test_classify_reserved_names() {
        assert_eq!(classify_directory("_SERVER"), DirectoryBehavior::Skip);
        assert_eq!(classify_directory("_CLIENT"), DirectoryBehavior::Ignore);
        assert_eq!(classify_directory("_OPTIONAL"), DirectoryBehavior::Ignore);
    }

    #[test]
    fn test_classify_normal_names() {
        assert_eq!(classify_directory("mods"), DirectoryBehavior::Continue);
        assert_eq!(classify_directory("_server"), DirectoryBehavior::Continue);
    }

    #[test]
    fn test_walk_nested_tree() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "mods/foo.jar");
        touch(temp.path(), "config/deep/nested/settings.cfg");
        touch(temp.path(), "root.txt");

        assert_eq!(
            relatives(temp.path()),
            vec![
                "config/deep/nested/settings.cfg",
                "mods/foo.jar",
                "root.txt"
            ]
        );
    }

    #[test]
    fn test_walk_skips_hidden_and_server_dirs() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), ".git/config");
        touch(temp.path(), ".git/objects/pack/data.pack");
        touch(temp.path(), "_SERVER/server-only.jar");
        touch(temp.path(), "mods/foo.jar");

        assert_eq!(relatives(temp.path()), vec!["mods/foo.jar"]);
    }

    #[test]
    fn test_walk_overlay_drops_segment() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "_OPTIONAL/extra.jar");
        touch(temp.path(), "_CLIENT/mods/client.jar");
        touch(temp.path(), "mods/_OPTIONAL/opt.jar");

        assert_eq!(
            relatives(temp.path()),
            vec!["extra.jar", "mods/client.jar", "mods/opt.jar"]
        );
    }

    #[test]
    fn test_walk_skip_inside_overlay() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "_OPTIONAL/_SERVER/hidden.jar");
        touch(temp.path(), "_OPTIONAL/kept.jar");

        assert_eq!(relatives(temp.path()), vec!["kept.jar"]);
    }

    #[test]
    fn test_walk_missing_root() {
        let temp = TempDir::new().unwrap();
        let result = walk_tree(&temp.path().join("absent"));
        assert!(matches!(result, Err(BuildError::Walk { .. })));
    }

    #[test]
    fn test_walk_custom_classifier() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "keep/a.txt");
        touch(temp.path(), "drop/b.txt");

        let candidates = walk_tree_with(temp.path(), |name| {
            if name == "drop" {
                DirectoryBehavior::Skip
            } else {
                DirectoryBehavior::Continue
            }
        })
        .unwrap();

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].relative, "keep/a.txt");
    }

    #[cfg(unix)]
    #[test]
    fn test_walk_skips_symlink_escaping_root() {
        use std::os::unix::fs::symlink;

        let outside = TempDir::new().unwrap();
        touch(outside.path(), "secret.txt");

        let temp = TempDir::new().unwrap();
        touch(temp.path(), "mods/foo.jar");
        symlink(outside.path().join("secret.txt"), temp.path().join("leak.txt")).unwrap();
        symlink(outside.path(), temp.path().join("leakdir")).unwrap();

        assert_eq!(relatives(temp.path()), vec!["mods/foo.jar"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_walk_follows_file_symlink_inside_root() {
        use std::os::unix::fs::symlink;

        let temp = TempDir::new().unwrap();
        touch(temp.path(), "mods/real.jar");
        symlink(
            temp.path().join("mods/real.jar"),
            temp.path().join("alias.jar"),
        )
        .unwrap();

        assert_eq!(relatives(temp.path()), vec!["alias.jar", "mods/real.jar"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_walk_skips_dangling_symlink() {
        use std::os::unix::fs::symlink;

        let temp = TempDir::new().unwrap();
        touch(temp.path(), "mods/foo.jar");
        symlink(temp.path().join("gone.jar"), temp.path().join("broken.jar")).unwrap();

        assert_eq!(relatives(temp.path()), vec!["mods/foo.jar"]);
    }
}
