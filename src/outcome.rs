use std::error::Error;
use std::process::Output;

use crate::BridgeResult;

/// Uniform result of one vectorization run, whichever strategy executed it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure {
        message: String,
        /// Diagnostic trail for operators; never meant to be parsed.
        detail: Option<String>,
    },
}

impl Outcome {
    /// Build a failure with no diagnostic detail.
    pub fn failure(message: impl Into<String>) -> Self {
        Outcome::Failure {
            message: message.into(),
            detail: None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success)
    }

    /// Normalize a finished engine process.
    ///
    /// Exit code 0 is a success. Otherwise the message is the captured stderr,
    /// or stdout when stderr is empty.
    pub fn from_process(output: &Output) -> Self {
        if output.status.success() {
            return Outcome::Success;
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        let stdout = String::from_utf8_lossy(&output.stdout);
        let message = [stderr.trim(), stdout.trim()]
            .into_iter()
            .find(|text| !text.is_empty())
            .map(str::to_owned)
            .unwrap_or_else(|| format!("engine exited with {}", output.status));

        Outcome::failure(message)
    }

    /// Normalize an in-process call: `Ok` is a success, any error a failure
    /// carrying its message and source chain.
    pub fn from_result<T>(result: BridgeResult<T>) -> Self {
        match result {
            Ok(_) => Outcome::Success,
            Err(err) => Outcome::from_error(&err),
        }
    }

    pub fn from_error(err: &(dyn Error + 'static)) -> Self {
        let message = err.to_string();
        let mut causes = Vec::new();
        let mut source = err.source();
        while let Some(cause) = source {
            let text = cause.to_string();
            if !message.contains(&text) {
                causes.push(text);
            }
            source = cause.source();
        }

        Outcome::Failure {
            message,
            detail: (!causes.is_empty()).then(|| causes.join(": ")),
        }
    }

    /// Single-line rendering of a failure for the error stream.
    pub fn failure_line(&self) -> Option<String> {
        match self {
            Outcome::Success => None,
            Outcome::Failure { message, detail } => {
                let line = match detail {
                    Some(detail) => format!("{message} ({detail})"),
                    None => message.clone(),
                };
                Some(line.split_whitespace().collect::<Vec<_>>().join(" "))
            }
        }
    }
}
