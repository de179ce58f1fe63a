//! Run pipeline
//!
//! Resolves the repository root and configuration, locates the formatter,
//! collects candidate files, invokes the formatter on each and reports:
//! - formatter missing: diagnostic on stderr, nothing touched
//! - no candidates: informational line on stdout
//! - any per-file failure: itemized report on stderr
//! - otherwise: a count of processed files on stdout

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use rayon::prelude::*;

use super::invoke::{Failure, Invocation, Mode};
use crate::cli::CliArgs;
use crate::collect::collect_files;
use crate::config::{Config, CONFIG_FILE_NAME};
use crate::error::{Result, EXIT_FAILURE, EXIT_NOT_FOUND, EXIT_SUCCESS};
use crate::locate::locate_formatter;
use crate::root::{explicit_root, resolve_root};

/// How a run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// No formatter candidate was found; no file was touched
    FormatterNotFound,
    /// The configured directories held no candidate files
    NothingToDo,
    /// Every candidate file was processed successfully
    Completed { count: usize },
    /// At least one file failed; `failures` is in candidate order
    Failed {
        attempted: usize,
        failures: Vec<Failure>,
    },
}

impl Outcome {
    /// Process exit status for this outcome
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Outcome::FormatterNotFound => EXIT_NOT_FOUND,
            Outcome::NothingToDo | Outcome::Completed { .. } => EXIT_SUCCESS,
            Outcome::Failed { .. } => EXIT_FAILURE,
        }
    }
}

/// Per-run behavior that does not come from the config file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    pub mode: Mode,
    /// Parallel invocations (1 = sequential, 0 = one per CPU)
    pub jobs: usize,
    /// Suppress informational output on stdout
    pub silent: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            mode: Mode::InPlace,
            jobs: 1,
            silent: false,
        }
    }
}

impl From<&CliArgs> for RunOptions {
    fn from(args: &CliArgs) -> Self {
        Self {
            mode: if args.check { Mode::Check } else { Mode::InPlace },
            jobs: args.jobs.unwrap_or(1),
            silent: args.silent,
        }
    }
}

/// Run the whole pipeline for parsed CLI arguments
///
/// User-facing messages go to `out` and `err`. An `Err` means setup failed
/// (root, config or output streams) before any file was processed.
pub fn run<O: Write, E: Write>(args: &CliArgs, out: &mut O, err: &mut E) -> Result<Outcome> {
    let root = match &args.root {
        Some(root) => explicit_root(root)?,
        None => resolve_root()?,
    };
    log::debug!("Repository root: {}", root.display());

    let config = build_config(args, &root)?;
    let formatter = locate_formatter(&config.formatter_candidates());

    format_repository(&root, &config, formatter, RunOptions::from(args), out, err)
}

/// Load the config for `root` and apply CLI overrides
pub fn build_config(args: &CliArgs, root: &Path) -> Result<Config> {
    let mut config = if let Some(path) = &args.config {
        log::debug!("Using explicit config file: {}", path.display());
        Config::from_toml_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?
    } else {
        Config::discover(root).with_context(|| {
            format!(
                "failed to load config {}",
                root.join(CONFIG_FILE_NAME).display()
            )
        })?
    };

    if let Some(formatter) = &args.formatter {
        config.pin_formatter(formatter);
    }
    config.exclude.extend(args.exclude.iter().cloned());

    log::debug!("Configuration: {config:?}");

    if let Some(error) = config.validate() {
        anyhow::bail!("Invalid configuration: {error}");
    }

    Ok(config)
}

/// Format every candidate file under `root` with an already-located formatter
pub fn format_repository<O: Write, E: Write>(
    root: &Path,
    config: &Config,
    formatter: Option<PathBuf>,
    options: RunOptions,
    out: &mut O,
    err: &mut E,
) -> Result<Outcome> {
    let Some(formatter) = formatter else {
        writeln!(
            err,
            "ERROR: {} not found on PATH. Install it or pass --formatter.",
            config.formatter
        )?;
        return Ok(Outcome::FormatterNotFound);
    };

    let style_path = root.join(&config.style_file);
    let use_style_file = style_path.exists();
    if use_style_file {
        log::debug!("Using style file {}", style_path.display());
    } else {
        log::debug!("No {} at root, using formatter defaults", config.style_file);
    }

    let exclude = config.exclude_patterns().map_err(anyhow::Error::msg)?;
    let files = collect_files(root, config, &exclude);
    if files.is_empty() {
        if !options.silent {
            writeln!(
                out,
                "No source files found under {}. Nothing to do.",
                describe_directories(&config.directories)
            )?;
        }
        return Ok(Outcome::NothingToDo);
    }
    log::debug!("Collected {} candidate files", files.len());

    let invocation = Invocation::new(formatter, options.mode, use_style_file);
    let failures = invoke_all(&invocation, &files, options.jobs);
    let tool = tool_name(invocation.formatter());

    if !failures.is_empty() {
        writeln!(err, "{tool} failed for the following files:")?;
        for failure in &failures {
            writeln!(err, " - {failure}")?;
        }
        return Ok(Outcome::Failed {
            attempted: files.len(),
            failures,
        });
    }

    if !options.silent {
        writeln!(
            out,
            "{} {} files with {tool}.",
            options.mode.past_tense(),
            files.len()
        )?;
    }
    Ok(Outcome::Completed { count: files.len() })
}

/// Invoke the formatter once per file, keeping failures in file order
fn invoke_all(invocation: &Invocation, files: &[PathBuf], jobs: usize) -> Vec<Failure> {
    if jobs == 1 {
        return files
            .iter()
            .filter_map(|path| invocation.run_on(path).err())
            .collect();
    }

    match rayon::ThreadPoolBuilder::new().num_threads(jobs).build() {
        Ok(pool) => pool.install(|| {
            files
                .par_iter()
                .filter_map(|path| invocation.run_on(path).err())
                .collect()
        }),
        Err(e) => {
            log::warn!("Failed to configure thread pool, running sequentially: {e}");
            invoke_all(invocation, files, 1)
        }
    }
}

/// Short name of the formatter for messages (`clang-format-17`, not its full path)
fn tool_name(formatter: &Path) -> String {
    formatter
        .file_stem()
        .map_or_else(|| formatter.display().to_string(), |s| s.to_string_lossy().into_owned())
}

fn describe_directories(directories: &[String]) -> String {
    directories
        .iter()
        .map(|d| format!("'{d}/'"))
        .collect::<Vec<_>>()
        .join(" or ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::parse_args_from;

    fn output(bytes: &[u8]) -> String {
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(Outcome::FormatterNotFound.exit_code(), 127);
        assert_eq!(Outcome::NothingToDo.exit_code(), 0);
        assert_eq!(Outcome::Completed { count: 3 }.exit_code(), 0);
        let failed = Outcome::Failed {
            attempted: 2,
            failures: vec![Failure {
                path: PathBuf::from("a.c"),
                message: "x".to_string(),
            }],
        };
        assert_eq!(failed.exit_code(), 1);
    }

    #[test]
    fn test_missing_formatter_touches_nothing() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("source")).unwrap();
        std::fs::write(dir.path().join("source/a.c"), "int  x;\n").unwrap();

        let (mut out, mut err) = (Vec::new(), Vec::new());
        let outcome = format_repository(
            dir.path(),
            &Config::default(),
            None,
            RunOptions::default(),
            &mut out,
            &mut err,
        )
        .unwrap();

        assert_eq!(outcome, Outcome::FormatterNotFound);
        assert!(output(&err).contains("clang-format not found on PATH"));
        assert!(out.is_empty());
        assert_eq!(
            std::fs::read_to_string(dir.path().join("source/a.c")).unwrap(),
            "int  x;\n"
        );
    }

    #[test]
    fn test_empty_tree_is_success() {
        let dir = tempfile::tempdir().unwrap();
        let (mut out, mut err) = (Vec::new(), Vec::new());
        let outcome = format_repository(
            dir.path(),
            &Config::default(),
            Some(PathBuf::from("clang-format")),
            RunOptions::default(),
            &mut out,
            &mut err,
        )
        .unwrap();

        assert_eq!(outcome, Outcome::NothingToDo);
        assert_eq!(
            output(&out),
            "No source files found under 'source/' or 'tests/'. Nothing to do.\n"
        );
        assert!(err.is_empty());
    }

    #[test]
    fn test_silent_suppresses_info() {
        let dir = tempfile::tempdir().unwrap();
        let (mut out, mut err) = (Vec::new(), Vec::new());
        let options = RunOptions {
            silent: true,
            ..Default::default()
        };
        format_repository(
            dir.path(),
            &Config::default(),
            Some(PathBuf::from("clang-format")),
            options,
            &mut out,
            &mut err,
        )
        .unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_run_options_from_args() {
        let args = parse_args_from(["format-runner", "--check", "-j", "4", "-S"]);
        let options = RunOptions::from(&args);
        assert_eq!(options.mode, Mode::Check);
        assert_eq!(options.jobs, 4);
        assert!(options.silent);

        let options = RunOptions::from(&parse_args_from(["format-runner"]));
        assert_eq!(options, RunOptions::default());
    }

    #[test]
    fn test_build_config_applies_overrides() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "exclude = [\"vendor\"]\n",
        )
        .unwrap();
        let args = parse_args_from([
            "format-runner",
            "--formatter",
            "clang-format-19",
            "-e",
            "generated",
        ]);

        let config = build_config(&args, dir.path()).unwrap();
        assert_eq!(config.formatter_candidates(), ["clang-format-19"]);
        assert_eq!(config.exclude, ["vendor", "generated"]);
    }

    #[test]
    fn test_build_config_rejects_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "extensions = []\n").unwrap();
        let args = parse_args_from(["format-runner"]);

        let err = build_config(&args, dir.path()).unwrap_err();
        assert!(err.to_string().contains("Invalid configuration"));
    }

    #[test]
    fn test_build_config_rejects_bad_exclude() {
        let dir = tempfile::tempdir().unwrap();
        let args = parse_args_from(["format-runner", "-e", "[oops"]);
        assert!(build_config(&args, dir.path()).is_err());
    }

    #[test]
    fn test_tool_name() {
        assert_eq!(tool_name(Path::new("/usr/bin/clang-format")), "clang-format");
        assert_eq!(tool_name(Path::new("/usr/bin/clang-format-17")), "clang-format-17");
        assert_eq!(tool_name(Path::new("C:/llvm/clang-format.exe")), "clang-format");
    }

    #[test]
    fn test_describe_directories() {
        let dirs = vec!["source".to_string(), "tests".to_string()];
        assert_eq!(describe_directories(&dirs), "'source/' or 'tests/'");
    }
}
