//! Single-file formatter invocation.

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Argument selecting the repository's style file
pub const STYLE_FILE_ARG: &str = "--style=file";

/// Message recorded when a failing formatter printed nothing
const UNKNOWN_ERROR: &str = "unknown error";

/// How the formatter treats each file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Rewrite files in place (`-i`)
    #[default]
    InPlace,
    /// Leave files untouched and fail on any needed change (`--dry-run --Werror`)
    Check,
}

impl Mode {
    fn args(self) -> &'static [&'static str] {
        match self {
            Mode::InPlace => &["-i"],
            Mode::Check => &["--dry-run", "--Werror"],
        }
    }

    /// Verb used in the run summary
    #[must_use]
    pub fn past_tense(self) -> &'static str {
        match self {
            Mode::InPlace => "Formatted",
            Mode::Check => "Checked",
        }
    }
}

/// A file the formatter could not process, with the reason
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub path: PathBuf,
    pub message: String,
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.message)
    }
}

impl std::error::Error for Failure {}

/// A resolved formatter plus the arguments shared by every file
#[derive(Debug, Clone)]
pub struct Invocation {
    formatter: PathBuf,
    mode: Mode,
    use_style_file: bool,
}

impl Invocation {
    #[must_use]
    pub fn new(formatter: PathBuf, mode: Mode, use_style_file: bool) -> Self {
        Self {
            formatter,
            mode,
            use_style_file,
        }
    }

    #[must_use]
    pub fn formatter(&self) -> &Path {
        &self.formatter
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Arguments passed to the formatter for `file`: mode flags, style, path
    #[must_use]
    pub fn args_for(&self, file: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = self.mode.args().iter().map(OsString::from).collect();
        if self.use_style_file {
            args.push(STYLE_FILE_ARG.into());
        }
        args.push(file.as_os_str().to_owned());
        args
    }

    /// Run the formatter on one file and wait for it to exit
    ///
    /// A non-zero exit becomes a [`Failure`] carrying the tool's diagnostics;
    /// a process that cannot be spawned becomes one carrying the launch error.
    pub fn run_on(&self, file: &Path) -> Result<(), Failure> {
        let args = self.args_for(file);
        log::debug!("Running {} {args:?}", self.formatter.display());

        let output = Command::new(&self.formatter)
            .args(&args)
            .output()
            .map_err(|e| Failure {
                path: file.to_path_buf(),
                message: format!("Exception: {e}"),
            })?;

        if output.status.success() {
            return Ok(());
        }

        log::debug!("{} exited with {}", self.formatter.display(), output.status);
        Err(Failure {
            path: file.to_path_buf(),
            message: failure_message(&output.stdout, &output.stderr),
        })
    }
}

/// Pick the diagnostic to report: stderr, else stdout, else a generic message
///
/// Streams are trimmed before choosing, so whitespace-only stderr falls through to stdout.
fn failure_message(stdout: &[u8], stderr: &[u8]) -> String {
    [stderr, stdout]
        .into_iter()
        .map(|bytes| String::from_utf8_lossy(bytes).trim().to_string())
        .find(|text| !text.is_empty())
        .unwrap_or_else(|| UNKNOWN_ERROR.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(args: &[OsString]) -> Vec<String> {
        args.iter().map(|a| a.to_string_lossy().into_owned()).collect()
    }

    #[test]
    fn test_in_place_args_without_style() {
        let inv = Invocation::new("clang-format".into(), Mode::InPlace, false);
        let args = inv.args_for(Path::new("/repo/source/a.c"));
        assert_eq!(strings(&args), ["-i", "/repo/source/a.c"]);
    }

    #[test]
    fn test_in_place_args_with_style() {
        let inv = Invocation::new("clang-format".into(), Mode::InPlace, true);
        let args = inv.args_for(Path::new("/repo/source/a.c"));
        assert_eq!(strings(&args), ["-i", "--style=file", "/repo/source/a.c"]);
    }

    #[test]
    fn test_check_args() {
        let inv = Invocation::new("clang-format".into(), Mode::Check, true);
        let args = inv.args_for(Path::new("b.h"));
        assert_eq!(
            strings(&args),
            ["--dry-run", "--Werror", "--style=file", "b.h"]
        );
    }

    #[test]
    fn test_failure_message_prefers_stderr() {
        assert_eq!(failure_message(b"out", b"  err\n"), "err");
    }

    #[test]
    fn test_failure_message_falls_back_to_stdout() {
        assert_eq!(failure_message(b"out\n", b""), "out");
        assert_eq!(failure_message(b"out", b" \n"), "out");
    }

    #[test]
    fn test_failure_message_generic() {
        assert_eq!(failure_message(b"", b""), "unknown error");
    }

    #[test]
    fn test_launch_error_is_recorded() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("no-such-formatter");
        let inv = Invocation::new(missing, Mode::InPlace, false);

        let failure = inv.run_on(Path::new("a.c")).unwrap_err();
        assert_eq!(failure.path, Path::new("a.c"));
        assert!(failure.message.starts_with("Exception: "));
    }

    #[test]
    fn test_failure_display() {
        let failure = Failure {
            path: PathBuf::from("/repo/tests/t.c"),
            message: "bad".to_string(),
        };
        assert_eq!(failure.to_string(), "/repo/tests/t.c: bad");
    }

    #[cfg(unix)]
    #[test]
    fn test_exit_status_drives_result() {
        let inv = Invocation::new("true".into(), Mode::InPlace, false);
        assert!(inv.run_on(Path::new("a.c")).is_ok());

        let inv = Invocation::new("false".into(), Mode::InPlace, false);
        let failure = inv.run_on(Path::new("a.c")).unwrap_err();
        assert_eq!(failure.message, "unknown error");
    }
}
