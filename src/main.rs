//! Binary entrypoint for the `issuegen` CLI.

use std::process::ExitCode;

fn main() -> ExitCode {
    match issuegen::run(std::env::args()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
