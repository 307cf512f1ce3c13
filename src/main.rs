mod cli;
mod logging;
mod report;

use std::process::ExitCode;

use clap::Parser;

use vtracer_bridge::{Bridge, BridgeResult, Outcome, ProcessVectorizer, resolve_payload};

use crate::cli::{Cli, EngineOptions, StrategyArg};

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init();
    let outcome = run(&cli);
    report::report_outcome(&outcome)
}

/// Resolve the configuration, then hand it to the selected strategy.
fn run(cli: &Cli) -> Outcome {
    let options = match resolve_payload(&cli.config) {
        Ok(options) => options,
        Err(err) => return Outcome::from_error(&err),
    };
    if cli.print_resolved {
        report::print_resolved(&options);
    }

    match build_bridge(&cli.engine) {
        Ok(bridge) => bridge.convert(&options, &cli.input, &cli.output),
        Err(err) => Outcome::from_error(&err),
    }
}

/// The convenience function to build a Bridge from the deployment options.
fn build_bridge(engine: &EngineOptions) -> BridgeResult<Bridge> {
    match engine.strategy {
        StrategyArg::Process => Ok(Bridge::new(
            ProcessVectorizer::new(engine.engine.clone())
                .with_leading_args(engine.engine_args.iter().cloned())
                .with_output_limit(engine.max_engine_output),
        )),
        #[cfg(feature = "vectorizer-vtracer")]
        StrategyArg::Library => Ok(Bridge::new(vtracer_bridge::VtracerVectorizer)),
        #[cfg(not(feature = "vectorizer-vtracer"))]
        StrategyArg::Library => Err(vtracer_bridge::BridgeError::Unavailable(
            "The library strategy",
        )),
    }
}
