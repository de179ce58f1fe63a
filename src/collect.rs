//! Candidate file collection.
//!
//! Walks each configured directory under the repository root and keeps files
//! whose extension is on the allow-list. Results are canonicalized and held in
//! a `BTreeSet`, which both removes duplicates reachable through symlinks and
//! gives a stable order independent of directory traversal order.

use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};

use glob::Pattern;
use walkdir::WalkDir;

use crate::config::Config;

/// Collect the sorted, deduplicated candidate files under `root`
///
/// Directories that do not exist are skipped. Unreadable entries are skipped
/// as well; symlink loops surface as walkdir errors and are dropped the same way.
/// Exclude globs apply to both the traversal path and the resolved path.
#[must_use]
pub fn collect_files(root: &Path, config: &Config, exclude: &[Pattern]) -> Vec<PathBuf> {
    let mut files = BTreeSet::new();
    let resolved_root = root.canonicalize().unwrap_or_else(|_| root.to_path_buf());

    for dir in &config.directories {
        let base = root.join(dir);
        if !base.is_dir() {
            log::debug!("Skipping missing directory {}", base.display());
            continue;
        }
        log::debug!("Scanning {}", base.display());

        for entry in WalkDir::new(&base)
            .follow_links(true)
            .into_iter()
            .filter_map(std::result::Result::ok)
        {
            let path = entry.path();
            if !entry.file_type().is_file()
                || !has_allowed_extension(path, &config.extensions)
                || is_excluded(path.strip_prefix(root).unwrap_or(path), exclude)
            {
                continue;
            }
            match path.canonicalize() {
                Ok(resolved) => {
                    let relative = resolved.strip_prefix(&resolved_root).unwrap_or(&resolved);
                    if is_excluded(relative, exclude) {
                        log::debug!("Excluding {} via {}", resolved.display(), path.display());
                        continue;
                    }
                    files.insert(resolved);
                }
                Err(e) => log::warn!("Skipping {}: {e}", path.display()),
            }
        }
    }

    files.into_iter().collect()
}

/// Check if a file's extension is on the allow-list (case-sensitive)
fn has_allowed_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|allowed| allowed == ext))
}

/// Check if a path matches any exclusion pattern
///
/// Paths are relative to the repository root. A pattern excludes a path if it
/// matches the whole relative path or any single path component.
fn is_excluded(path: &Path, patterns: &[Pattern]) -> bool {
    if patterns.is_empty() {
        return false;
    }

    let path_str = path.to_string_lossy();

    patterns.iter().any(|pattern| {
        pattern.matches(&path_str)
            || path.components().any(|component| match component {
                Component::Normal(c) => pattern.matches(&c.to_string_lossy()),
                _ => false,
            })
    })
}
