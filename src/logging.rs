use tracing_subscriber::EnvFilter;

use vtracer_bridge::ENV_LOG;

/// Install the stderr log sink. Logging stays off unless the filter variable is set,
/// so the single-line output contract holds by default.
pub fn init() {
    let filter = EnvFilter::try_from_env(ENV_LOG).unwrap_or_else(|_| EnvFilter::new("off"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
