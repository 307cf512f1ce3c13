pub mod config;
pub mod error;
pub mod outcome;
pub mod resolve;
pub mod vectorizer;

pub use config::{ColorMode, Hierarchy, PathMode, VectorizerOptions};
pub use error::{BridgeError, BridgeResult};
pub use outcome::Outcome;
pub use resolve::{RawConfig, parse_config, resolve, resolve_payload};
pub use vectorizer::Vectorizer;
pub use vectorizer::process::{DEFAULT_ENGINE_PROGRAM, ProcessVectorizer, build_args};
#[cfg(feature = "vectorizer-vtracer")]
pub use vectorizer::vtracer::{VtracerVectorizer, trace_to_svg_string};

use std::path::Path;

use tracing::{info, warn};

/// Environment variable selecting the invocation strategy (`process` or `library`).
pub const ENV_STRATEGY: &str = "VTRACER_BRIDGE_STRATEGY";
/// Environment variable naming the engine program for the process strategy.
pub const ENV_ENGINE: &str = "VTRACER_BRIDGE_ENGINE";
/// Environment variable capping captured engine output, in bytes.
pub const ENV_MAX_OUTPUT: &str = "VTRACER_BRIDGE_MAX_OUTPUT";
/// Environment variable holding the log filter directive.
pub const ENV_LOG: &str = "VTRACER_BRIDGE_LOG";

/// Entry point tying configuration resolution to one invocation strategy.
pub struct Bridge {
    vectorizer: Box<dyn Vectorizer>,
}

impl Bridge {
    pub fn new(vectorizer: impl Vectorizer + 'static) -> Self {
        Self {
            vectorizer: Box::new(vectorizer),
        }
    }

    /// Name of the strategy this bridge dispatches to.
    pub fn strategy(&self) -> &'static str {
        self.vectorizer.name()
    }

    /// Resolve `config_payload` and convert `input` into `output`.
    ///
    /// Configuration errors are reported before the engine is touched.
    pub fn run(&self, input: &Path, output: &Path, config_payload: &str) -> Outcome {
        match resolve_payload(config_payload) {
            Ok(options) => self.convert(&options, input, output),
            Err(err) => Outcome::from_error(&err),
        }
    }

    /// Convert with already resolved options.
    pub fn convert(&self, options: &VectorizerOptions, input: &Path, output: &Path) -> Outcome {
        let outcome = self.vectorizer.convert(options, input, output);
        match &outcome {
            Outcome::Success => info!(strategy = self.strategy(), "conversion succeeded"),
            Outcome::Failure { message, .. } => {
                warn!(strategy = self.strategy(), %message, "conversion failed")
            }
        }
        outcome
    }
}

impl std::fmt::Debug for Bridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bridge")
            .field("strategy", &self.strategy())
            .finish()
    }
}
