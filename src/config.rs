//! Configuration management for format-runner.
//!
//! This module provides the [`Config`] struct which controls which files are
//! collected and which formatter is invoked. Configuration can be loaded from:
//! - A TOML file (`format-runner.toml`) at the repository root
//! - An explicit TOML file passed with `--config`
//! - CLI arguments (which override file settings)
//!
//! Every field has a default, so a repository without a config file gets the
//! stock behavior: `source/` and `tests/`, C/C++ extensions, `clang-format`.

use std::path::Path;

use glob::Pattern;
use serde::Deserialize;

/// Config file looked up at the repository root
pub const CONFIG_FILE_NAME: &str = "format-runner.toml";

const DEFAULT_DIRECTORIES: &[&str] = &["source", "tests"];

const DEFAULT_EXTENSIONS: &[&str] = &["c", "cc", "cpp", "h", "hpp"];

const DEFAULT_FORMATTER: &str = "clang-format";

/// Tried in order when the canonical formatter name is not on the search path
const DEFAULT_FALLBACK_FORMATTERS: &[&str] = &[
    "clang-format.exe",
    "clang-format-15",
    "clang-format-16",
    "clang-format-17",
    "clang-format-18",
    "clang-format-19",
    "clang-format-20",
    "clang-format-21",
];

const DEFAULT_STYLE_FILE: &str = ".clang-format";

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(ToString::to_string).collect()
}

/// Main configuration struct for format-runner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directories (relative to the repository root) searched recursively
    pub directories: Vec<String>,

    /// File extensions to format, without the leading dot
    pub extensions: Vec<String>,

    /// Canonical formatter name (or path) looked up first
    pub formatter: String,

    /// Alternative formatter names, tried in order
    pub fallback_formatters: Vec<String>,

    /// Style file whose presence at the root enables `--style=file`
    pub style_file: String,

    /// Glob patterns for files or directories to skip
    pub exclude: Vec<String>,
}

/// Partial configuration for TOML parsing
///
/// All fields are `Option<T>` so a file that only sets `exclude` leaves the
/// default directories and formatter untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct PartialConfig {
    pub directories: Option<Vec<String>>,
    pub extensions: Option<Vec<String>>,
    pub formatter: Option<String>,
    pub fallback_formatters: Option<Vec<String>>,
    pub style_file: Option<String>,
    pub exclude: Option<Vec<String>>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            directories: to_strings(DEFAULT_DIRECTORIES),
            extensions: to_strings(DEFAULT_EXTENSIONS),
            formatter: DEFAULT_FORMATTER.to_string(),
            fallback_formatters: to_strings(DEFAULT_FALLBACK_FORMATTERS),
            style_file: DEFAULT_STYLE_FILE.to_string(),
            exclude: Vec::new(),
        }
    }
}

impl Config {
    /// Validate configuration values
    ///
    /// Returns an error message if validation fails, None if valid.
    #[must_use]
    pub fn validate(&self) -> Option<String> {
        if self.directories.is_empty() {
            return Some("directories must name at least one directory".to_string());
        }
        if let Some(dir) = self.directories.iter().find(|d| d.trim().is_empty()) {
            return Some(format!("directories contains an empty entry {dir:?}"));
        }
        if self.extensions.is_empty() {
            return Some("extensions must name at least one extension".to_string());
        }
        for ext in &self.extensions {
            if ext.is_empty() {
                return Some("extensions contains an empty entry".to_string());
            }
            if ext.contains(['/', '\\']) {
                return Some(format!("extension {ext:?} contains a path separator"));
            }
        }
        if self.formatter.trim().is_empty() {
            return Some("formatter must not be empty".to_string());
        }
        if self.style_file.trim().is_empty() {
            return Some("style_file must not be empty".to_string());
        }
        if let Err(e) = self.exclude_patterns() {
            return Some(e);
        }
        None
    }

    /// Load configuration from a TOML file
    pub fn from_toml_file(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let partial: PartialConfig = toml::from_str(&contents)?;
        let mut config = Self::default();
        config.apply_partial(partial);
        Ok(config)
    }

    /// Load `format-runner.toml` from the repository root, or defaults if absent
    pub fn discover(root: &Path) -> anyhow::Result<Self> {
        let path = root.join(CONFIG_FILE_NAME);
        if path.is_file() {
            log::debug!("Using config file: {}", path.display());
            Self::from_toml_file(&path)
        } else {
            log::debug!("No {CONFIG_FILE_NAME} in {}, using defaults", root.display());
            Ok(Self::default())
        }
    }

    /// Apply a partial config, only overriding fields that are explicitly set
    fn apply_partial(&mut self, partial: PartialConfig) {
        if let Some(v) = partial.directories {
            self.directories = v;
        }
        if let Some(v) = partial.extensions {
            self.extensions = v.iter().map(|e| normalize_extension(e)).collect();
        }
        if let Some(v) = partial.formatter {
            self.formatter = v;
        }
        if let Some(v) = partial.fallback_formatters {
            self.fallback_formatters = v;
        }
        if let Some(v) = partial.style_file {
            self.style_file = v;
        }
        if let Some(v) = partial.exclude {
            self.exclude = v;
        }
    }

    /// Formatter names in lookup order: the canonical name, then fallbacks
    #[must_use]
    pub fn formatter_candidates(&self) -> Vec<&str> {
        std::iter::once(self.formatter.as_str())
            .chain(self.fallback_formatters.iter().map(String::as_str))
            .collect()
    }

    /// Pin the formatter to a single explicit name or path, with no fallbacks
    pub fn pin_formatter(&mut self, formatter: &str) {
        self.formatter = formatter.to_string();
        self.fallback_formatters.clear();
    }

    /// Compile the exclude globs
    pub fn exclude_patterns(&self) -> Result<Vec<Pattern>, String> {
        self.exclude
            .iter()
            .map(|p| Pattern::new(p).map_err(|e| format!("invalid exclude pattern {p:?}: {e}")))
            .collect()
    }
}

/// Strip a leading dot so `.cpp` and `cpp` mean the same extension
#[must_use]
pub fn normalize_extension(ext: &str) -> String {
    ext.strip_prefix('.').unwrap_or(ext).to_string()
}
