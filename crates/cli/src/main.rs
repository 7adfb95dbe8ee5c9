use std::io::{stdout, Write};
use std::process::ExitCode;

use cmdterm_cli::commands::program;
use cmdterm_core::config::exit;
use cmdterm_core::Outcome;
use log::{debug, error};

fn exit_code(code: i32) -> ExitCode {
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}

fn main() -> ExitCode {
    env_logger::init();

    match program().run() {
        Outcome::Value(job) => {
            let mut stdout = stdout();
            match writeln!(stdout, "{}", job.report()).and_then(|()| stdout.flush()) {
                Ok(()) => ExitCode::SUCCESS,
                Err(e) => {
                    error!("Could not write the result: {e}");
                    exit_code(exit::INTERNAL_ERROR)
                }
            }
        }
        outcome => {
            debug!("Exiting with {outcome:?}");
            exit_code(outcome.exit_code())
        }
    }
}
