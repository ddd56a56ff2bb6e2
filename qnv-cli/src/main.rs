//! `qnv`: verifies probabilistic entanglement programs against a topology.

mod cli;
mod logging;

use std::process::ExitCode;

use clap::Parser as _;

use cli::{run, Cli};

fn main() -> ExitCode {
    logging::init_logging();
    let args = Cli::parse();

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match run(&args, &mut out) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&err);
            ExitCode::FAILURE
        }
    }
}

#[expect(
    clippy::print_stderr,
    reason = "the CLI's own diagnostic channel is stderr, not the tracing subscriber"
)]
fn report_error(err: &cli::CliError) {
    eprintln!("qnv: error ({}): {err}", error_code_str(err));
    if let cli::CliError::Syntax(errors) = err {
        for parse_error in errors {
            eprintln!("  {parse_error}");
        }
    }
}

const fn error_code_str(err: &cli::CliError) -> &'static str {
    match err.code() {
        cli::CliErrorCode::Syntax => "SYNTAX",
        cli::CliErrorCode::Topology => "TOPOLOGY",
        cli::CliErrorCode::Interpret => "INTERPRET",
        cli::CliErrorCode::Io => "IO",
        cli::CliErrorCode::NoAction => "NO_ACTION",
    }
}
