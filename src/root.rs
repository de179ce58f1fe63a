//! Repository root resolution.
//!
//! The runner is installed one directory below the repository root
//! (`<root>/tools/format-runner`), so the root is two levels above the
//! canonical location of the running executable.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};

use crate::error::Result;

/// Resolve the repository root from the running executable's location
pub fn resolve_root() -> Result<PathBuf> {
    let exe = std::env::current_exe().context("failed to locate the running executable")?;
    root_from_program(&exe)
}

/// Resolve the repository root for a program located at `program`
///
/// The program path is canonicalized first, so symlinked installs resolve
/// relative to their target.
pub fn root_from_program(program: &Path) -> Result<PathBuf> {
    let program = program
        .canonicalize()
        .with_context(|| format!("failed to resolve {}", program.display()))?;

    let root = program
        .parent()
        .and_then(Path::parent)
        .map(Path::to_path_buf)
        .ok_or_else(|| anyhow!("{} has no grandparent directory", program.display()))?;

    log::debug!(
        "Resolved repository root {} from {}",
        root.display(),
        program.display()
    );
    Ok(root)
}

/// Canonicalize an explicitly requested root, rejecting anything but a directory
pub fn explicit_root(root: &Path) -> Result<PathBuf> {
    let resolved = root
        .canonicalize()
        .with_context(|| format!("repository root {} does not exist", root.display()))?;
    if !resolved.is_dir() {
        anyhow::bail!("repository root {} is not a directory", resolved.display());
    }
    Ok(resolved)
}
