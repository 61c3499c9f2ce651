use std::fmt;
use std::io;
use std::path::{Component, Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{AppError, Result};
use crate::rules::RuleSet;

/// A non-fatal problem encountered while scanning, e.g. a subdirectory
/// that could not be opened. The walk continues and the affected
/// subtree is omitted.
#[derive(Debug)]
pub struct ScanWarning {
    pub path: PathBuf,
    pub reason: String,
}

impl fmt::Display for ScanWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "could not read {}: {}", self.path.display(), self.reason)
    }
}

/// The outcome of one traversal: the surviving relative file paths,
/// sorted lexicographically, plus any warnings collected on the way.
#[derive(Debug, Default)]
pub struct TraversalResult {
    pub files: Vec<String>,
    pub warnings: Vec<ScanWarning>,
}

/// Walks the tree under `root` top-down, pruning ignored directories
/// and collecting the relative paths of files that survive the rules.
///
/// Each subdirectory is checked once with `is_dir = true`; an ignored
/// directory is never descended into, so nothing beneath it can be
/// re-included by a later negation. Files are checked with
/// `is_dir = false`. Symlinks are not followed: a symlink to a file is
/// a file candidate, a symlink to a directory is neither descended nor
/// listed.
///
/// Subdirectories that cannot be read produce a [`ScanWarning`] and
/// are skipped; an unreadable `root` fails the whole walk with
/// [`AppError::Scan`].
pub fn walk(root: &Path, rules: &RuleSet) -> Result<TraversalResult> {
    log::debug!(
        "Walking {} with {} ignore patterns.",
        root.display(),
        rules.len()
    );

    let mut files = Vec::new();
    let mut warnings = Vec::new();

    let walker = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| {
            if entry.depth() == 0 || !entry.file_type().is_dir() {
                return true;
            }
            match relative_slash_path(root, entry.path()) {
                Some(rel) => {
                    let ignored = rules.is_ignored(&rel, true);
                    if ignored {
                        log::trace!("Pruning ignored directory: {}", rel);
                    }
                    !ignored
                }
                None => true,
            }
        });

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                if err.path() == Some(root) {
                    let source = err
                        .into_io_error()
                        .unwrap_or_else(|| io::Error::other("walk aborted"));
                    return Err(AppError::Scan {
                        path: root.to_path_buf(),
                        source,
                    });
                }
                let warning = ScanWarning {
                    path: err.path().map(Path::to_path_buf).unwrap_or_default(),
                    reason: err
                        .io_error()
                        .map(|e| e.to_string())
                        .unwrap_or_else(|| err.to_string()),
                };
                log::warn!("Skipping unreadable directory entry: {}", warning);
                warnings.push(warning);
                continue;
            }
        };

        if entry.depth() == 0 {
            continue;
        }
        let file_type = entry.file_type();
        if file_type.is_dir() {
            continue;
        }
        // A dangling or directory-targeted symlink is not a file.
        if file_type.is_symlink() && !entry.path().is_file() {
            continue;
        }

        let Some(rel) = relative_slash_path(root, entry.path()) else {
            log::warn!("Could not relativize path: {}", entry.path().display());
            continue;
        };
        if !rules.is_ignored(&rel, false) {
            files.push(rel);
        } else {
            log::trace!("Excluding file: {}", rel);
        }
    }

    // Deterministic output regardless of filesystem enumeration order.
    files.sort_unstable();

    log::info!(
        "Walk complete: {} files included, {} warnings.",
        files.len(),
        warnings.len()
    );
    Ok(TraversalResult { files, warnings })
}

/// Builds the forward-slash relative path of `path` under `root`.
fn relative_slash_path(root: &Path, path: &Path) -> Option<String> {
    let rel = pathdiff::diff_paths(path, root)?;
    let parts: Vec<String> = rel
        .components()
        .filter_map(|c| match c {
            Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::DEFAULT_IGNORE_PATTERNS;
    use std::fs;
    use tempfile::TempDir;

    fn write_file(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    fn rules_with_defaults(user: &[&str]) -> RuleSet {
        let lines: Vec<&str> = DEFAULT_IGNORE_PATTERNS
            .iter()
            .copied()
            .chain(user.iter().copied())
            .collect();
        RuleSet::compile(lines).unwrap()
    }

    #[test]
    fn mixed_tree_scenario() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write_file(root, "main.py", "print('hello')");
        write_file(root, "README.md", "# Project");
        write_file(root, "app.log", "log message");
        write_file(root, ".env", "SECRET=123");
        write_file(root, "build/output.bin", "");
        write_file(root, "src/module.py", "code");

        let rules = rules_with_defaults(&["*.log", "build/"]);
        let result = walk(root, &rules).unwrap();
        assert_eq!(result.files, vec!["README.md", "main.py", "src/module.py"]);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn empty_root_yields_empty_result() {
        let dir = TempDir::new().unwrap();
        let rules = RuleSet::compile(["*.log"]).unwrap();
        let result = walk(dir.path(), &rules).unwrap();
        assert!(result.files.is_empty());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn missing_root_is_a_scan_error() {
        let dir = TempDir::new().unwrap();
        let rules = RuleSet::compile(["*.log"]).unwrap();
        let missing = dir.path().join("does-not-exist");
        match walk(&missing, &rules) {
            Err(AppError::Scan { path, .. }) => assert_eq!(path, missing),
            other => panic!("expected scan error, got {other:?}"),
        }
    }

    #[test]
    fn pruned_directory_is_never_descended() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write_file(root, "node_modules/pkg/index.js", "x");
        write_file(root, "node_modules/pkg/deep/leaf.js", "y");
        write_file(root, "src/app.js", "z");

        let rules = RuleSet::compile(["node_modules/"]).unwrap();
        let result = walk(root, &rules).unwrap();
        assert_eq!(result.files, vec!["src/app.js"]);
    }

    #[test]
    fn negation_cannot_reach_into_pruned_directory() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write_file(root, "build/keep.txt", "wanted");
        write_file(root, "top.txt", "kept");

        // The negation would match in isolation, but build/ is pruned
        // before its contents are ever enumerated.
        let rules = RuleSet::compile(["build/", "!build/keep.txt"]).unwrap();
        let result = walk(root, &rules).unwrap();
        assert_eq!(result.files, vec!["top.txt"]);
    }

    #[test]
    fn anchored_pattern_spares_nested_directory() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write_file(root, "build/a.txt", "");
        write_file(root, "src/build/b.txt", "");

        let rules = RuleSet::compile(["/build"]).unwrap();
        let result = walk(root, &rules).unwrap();
        assert_eq!(result.files, vec!["src/build/b.txt"]);
    }

    #[test]
    fn directory_only_pattern_spares_file_of_same_name() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write_file(root, "logs", "a file named logs");
        write_file(root, "sub/logs/trace.txt", "");

        let rules = RuleSet::compile(["logs/"]).unwrap();
        let result = walk(root, &rules).unwrap();
        assert_eq!(result.files, vec!["logs"]);
    }

    #[test]
    fn result_is_sorted_lexicographically() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write_file(root, "z.txt", "");
        write_file(root, "a/b.txt", "");
        write_file(root, "a.txt", "");

        let rules = RuleSet::compile::<_, &str>([]).unwrap();
        let result = walk(root, &rules).unwrap();
        assert_eq!(result.files, vec!["a.txt", "a/b.txt", "z.txt"]);
    }

    #[test]
    fn walk_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write_file(root, "one.txt", "");
        write_file(root, "two/three.txt", "");

        let rules = RuleSet::compile(["*.log"]).unwrap();
        let first = walk(root, &rules).unwrap();
        let second = walk(root, &rules).unwrap();
        assert_eq!(first.files, second.files);
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_subdirectory_is_a_warning_not_an_error() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write_file(root, "ok.txt", "");
        write_file(root, "locked/secret.txt", "");
        let locked = root.join("locked");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        let rules = RuleSet::compile::<_, &str>([]).unwrap();
        let result = walk(root, &rules).unwrap();
        // Restore so TempDir cleanup can remove it.
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        assert_eq!(result.files, vec!["ok.txt"]);
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.warnings[0].path, locked);
    }
}
