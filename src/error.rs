//! Error types and result aliases for format-runner.
//!
//! Setup problems (an unresolvable root, a malformed config file, bad CLI
//! values) surface as [`Result<T>`], a type alias for `anyhow::Result<T>`.
//! A formatter rejecting a single file is not an error at this level; it is
//! recorded as a [`crate::process::Failure`] and reported with the rest.

use anyhow::Result as AnyhowResult;

pub type Result<T> = AnyhowResult<T>;

/// Exit status when every candidate file was handled (or there were none)
pub const EXIT_SUCCESS: i32 = 0;

/// Exit status when at least one file failed to format
pub const EXIT_FAILURE: i32 = 1;

/// Exit status for invalid configuration or other setup errors
pub const EXIT_USAGE: i32 = 2;

/// Exit status when no formatter executable could be located
pub const EXIT_NOT_FOUND: i32 = 127;
