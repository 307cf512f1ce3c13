use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for operations that may fail with [`BridgeError`].
pub type BridgeResult<T> = std::result::Result<T, BridgeError>;

/// Error types that can occur while resolving configuration or driving the engine.
///
/// This enum covers malformed configuration payloads, values the resolver
/// cannot coerce, and failures raised while running either invocation strategy.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The configuration payload is not valid JSON.
    #[error("Malformed configuration: {0}")]
    Config(#[from] serde_json::Error),
    /// The configuration payload parsed, but is not a JSON object.
    #[error("Malformed configuration: expected a JSON object, got {0}")]
    NotAnObject(&'static str),
    /// A numeric key carries a value that cannot be converted to its target type.
    #[error("Invalid value for `{key}`: {reason}")]
    InvalidValue { key: &'static str, reason: String },
    /// A resolved value does not fit the type the engine expects.
    #[error("Value {value} for `{field}` is out of range for the engine")]
    OutOfRange { field: &'static str, value: String },
    /// File system I/O error.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// Image loading or decoding error.
    #[cfg(feature = "vectorizer-vtracer")]
    #[error("Image decoding failed: {0}")]
    Image(#[from] image::ImageError),
    /// Vectorization inside the engine failed.
    #[error("Tracing failed: {0}")]
    Trace(String),
    /// The engine process could not be started.
    #[error("Failed to launch engine {}: {source}", program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The requested feature was compiled out of this build.
    #[error("{0} is not available in this build")]
    Unavailable(&'static str),
    /// The engine wrote more to stdout or stderr than the configured cap.
    #[error("Engine output exceeded {limit} bytes")]
    OutputLimit { limit: usize },
}
