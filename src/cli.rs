use std::ffi::OsString;
use std::path::PathBuf;

use clap::{Args, Parser, ValueEnum};
use vtracer_bridge::{DEFAULT_ENGINE_PROGRAM, ENV_ENGINE, ENV_MAX_OUTPUT, ENV_STRATEGY};

/// Command line interface definition.
#[derive(Parser, Debug)]
#[command(author, version, about, disable_version_flag = true)]
pub struct Cli {
    /// Input raster image path
    pub input: PathBuf,
    /// Output SVG path (overwritten if it exists)
    pub output: PathBuf,
    /// Vectorizer settings as a JSON object
    #[arg(value_name = "CONFIG_JSON", default_value = "{}")]
    pub config: String,
    /// Print the resolved settings as JSON to stderr before converting
    #[arg(long = "print-resolved")]
    pub print_resolved: bool,
    #[command(flatten)]
    pub engine: EngineOptions,
}

/// Deployment settings: which strategy runs the engine and how.
#[derive(Args, Debug)]
pub struct EngineOptions {
    /// How the engine is invoked
    #[arg(long, value_enum, env = ENV_STRATEGY, default_value_t = StrategyArg::default())]
    pub strategy: StrategyArg,
    /// Engine program for the process strategy
    #[arg(long, env = ENV_ENGINE, default_value = DEFAULT_ENGINE_PROGRAM)]
    pub engine: PathBuf,
    /// Argument passed to the engine before the input path (repeatable)
    #[arg(long = "engine-arg", value_name = "ARG", allow_hyphen_values = true)]
    pub engine_args: Vec<OsString>,
    /// Cap on captured engine stdout/stderr, in bytes
    #[arg(long = "max-engine-output", value_name = "BYTES", env = ENV_MAX_OUTPUT)]
    pub max_engine_output: Option<usize>,
}

/// The argument to specify which invocation strategy to use.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    /// Launch the engine CLI as a child process
    Process,
    /// Call VTracer in-process
    Library,
}

impl Default for StrategyArg {
    fn default() -> Self {
        if cfg!(feature = "vectorizer-vtracer") {
            StrategyArg::Library
        } else {
            StrategyArg::Process
        }
    }
}
