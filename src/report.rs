use std::process::ExitCode;

use vtracer_bridge::{Outcome, VectorizerOptions};

/// Emit the single terminal line for `outcome` and pick the exit status.
pub fn report_outcome(outcome: &Outcome) -> ExitCode {
    match outcome.failure_line() {
        None => {
            println!("SUCCESS");
            ExitCode::SUCCESS
        }
        Some(line) => {
            eprintln!("ERROR: {line}");
            ExitCode::FAILURE
        }
    }
}

pub fn print_resolved(options: &VectorizerOptions) {
    match serde_json::to_string(options) {
        Ok(json) => eprintln!("{json}"),
        Err(err) => tracing::warn!(%err, "could not serialize resolved settings"),
    }
}
