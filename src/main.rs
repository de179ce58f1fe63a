//! format-runner - run clang-format over the C/C++ sources of a repository

#![warn(clippy::all)]
#![warn(clippy::pedantic)]

use std::io;

use format_runner::error::EXIT_USAGE;
use format_runner::{parse_args, run};

fn main() {
    let args = parse_args();
    init_logging(args.debug);

    let code = match run(&args, &mut io::stdout(), &mut io::stderr()) {
        Ok(outcome) => {
            log::debug!("Run finished: {outcome:?}");
            outcome.exit_code()
        }
        Err(e) => {
            eprintln!("Error: {e:#}");
            EXIT_USAGE
        }
    };

    std::process::exit(code);
}

/// Configure `env_logger`; `RUST_LOG` takes precedence over `--debug`
fn init_logging(debug: bool) {
    let default_filter = if debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}
