//! Formatter invocation and the run pipeline.
//!
//! [`Invocation`] runs the external formatter on a single file and turns a
//! non-zero exit or a launch error into a [`Failure`]. The pipeline drives it
//! over every collected file and maps the result to an [`Outcome`], whose
//! [`Outcome::exit_code`] is the process exit status.
//!
//! The main entry point is [`run`], which takes parsed CLI arguments and
//! writes user-facing messages to any pair of `Write` implementations.

pub mod invoke;
pub mod pipeline;

pub use invoke::{Failure, Invocation, Mode, STYLE_FILE_ARG};
pub use pipeline::{build_config, format_repository, run, Outcome, RunOptions};
