//! format-runner - run clang-format over the C/C++ sources of a repository
//!
//! Collects `.c`, `.cc`, `.cpp`, `.h` and `.hpp` files under `source/` and
//! `tests/`, formats each in place with the first clang-format found on the
//! search path, and reports failures per file.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

pub mod cli;
pub mod collect;
pub mod config;
pub mod error;
pub mod locate;
pub mod process;
pub mod root;

// Re-export commonly used types
pub use cli::{build_cli, parse_args, parse_args_from, CliArgs};
pub use collect::collect_files;
pub use config::Config;
pub use error::Result;
pub use locate::{locate_formatter, locate_formatter_in};
pub use process::{run, Failure, Mode, Outcome};
