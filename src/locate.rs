//! Formatter executable lookup.
//!
//! Candidates are tried in order and the first one found on the search path
//! wins. Not finding any of them is an ordinary outcome, so lookup returns
//! `Option` rather than an error.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Locate the first candidate present on the process `PATH`
#[must_use]
pub fn locate_formatter<S: AsRef<str>>(candidates: &[S]) -> Option<PathBuf> {
    locate_with(candidates, |name| which::which(name))
}

/// Locate the first candidate present on an explicit search path
///
/// `search_path` uses the platform's `PATH` syntax; relative candidates are
/// resolved against `cwd`.
#[must_use]
pub fn locate_formatter_in<S: AsRef<str>>(
    candidates: &[S],
    search_path: &OsStr,
    cwd: &Path,
) -> Option<PathBuf> {
    locate_with(candidates, |name| which::which_in(name, Some(search_path), cwd))
}

fn locate_with<S, F>(candidates: &[S], mut lookup: F) -> Option<PathBuf>
where
    S: AsRef<str>,
    F: FnMut(&str) -> which::Result<PathBuf>,
{
    candidates.iter().map(AsRef::as_ref).find_map(|name| match lookup(name) {
        Ok(path) => {
            log::debug!("Formatter {name} found at {}", path.display());
            Some(path)
        }
        Err(e) => {
            log::debug!("Formatter {name} not found: {e}");
            None
        }
    })
}
