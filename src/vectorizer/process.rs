//! Runs the engine's command-line interface as a child process.

use std::ffi::OsString;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use std::thread;

use tracing::{debug, info, warn};

use crate::config::VectorizerOptions;
use crate::outcome::Outcome;
use crate::{BridgeError, BridgeResult};

use super::Vectorizer;

/// Engine program used when none is configured.
pub const DEFAULT_ENGINE_PROGRAM: &str = "vtracer";

/// Drives the engine CLI: `<program> [leading args] <input> <output> --flag value ...`.
#[derive(Debug, Clone)]
pub struct ProcessVectorizer {
    program: PathBuf,
    leading_args: Vec<OsString>,
    output_limit: Option<usize>,
}

impl Default for ProcessVectorizer {
    fn default() -> Self {
        Self::new(DEFAULT_ENGINE_PROGRAM)
    }
}

impl ProcessVectorizer {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            leading_args: Vec::new(),
            output_limit: None,
        }
    }

    /// Arguments placed before the input path, e.g. the script an interpreter should run.
    pub fn with_leading_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.leading_args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Cap how many bytes of stdout and stderr are kept. `None` keeps everything.
    pub fn with_output_limit(mut self, limit: Option<usize>) -> Self {
        self.output_limit = limit;
        self
    }

    /// Launch the engine once and wait for it, capturing both output streams in full.
    pub fn run(
        &self,
        options: &VectorizerOptions,
        input: &Path,
        output: &Path,
    ) -> BridgeResult<Output> {
        let mut command = Command::new(&self.program);
        command
            .args(&self.leading_args)
            .args(build_args(options, input, output))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        debug!(
            program = %self.program.display(),
            args = ?command.get_args().collect::<Vec<_>>(),
            "launching engine"
        );

        let mut child = command.spawn().map_err(|source| BridgeError::Spawn {
            program: self.program.clone(),
            source,
        })?;

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let limit = self.output_limit;
        // Both pipes are drained at once so a chatty child cannot block on a full pipe.
        let (stdout, stderr) = thread::scope(|scope| {
            let stdout = scope.spawn(move || drain(stdout, limit));
            let stderr = scope.spawn(move || drain(stderr, limit));
            (join_reader(stdout.join()), join_reader(stderr.join()))
        });
        let status = child.wait()?;
        let (stdout, stderr) = (stdout?, stderr?);

        if let Some(limit) = limit
            && (stdout.overflowed || stderr.overflowed)
        {
            warn!(limit, "engine output exceeded cap");
            return Err(BridgeError::OutputLimit { limit });
        }

        debug!(%status, "engine exited");
        Ok(Output {
            status,
            stdout: stdout.bytes,
            stderr: stderr.bytes,
        })
    }
}

impl Vectorizer for ProcessVectorizer {
    fn name(&self) -> &'static str {
        "process"
    }

    fn convert(&self, options: &VectorizerOptions, input: &Path, output: &Path) -> Outcome {
        info!(input = %input.display(), output = %output.display(), "running engine process");
        match self.run(options, input, output) {
            Ok(finished) => Outcome::from_process(&finished),
            Err(err) => Outcome::from_error(&err),
        }
    }
}

/// Build the engine argument list: input and output paths followed by every
/// resolved parameter as a `--flag value` pair.
pub fn build_args(options: &VectorizerOptions, input: &Path, output: &Path) -> Vec<OsString> {
    let flags: [(&str, String); 11] = [
        ("--color-mode", options.color_mode.as_flag_value().to_string()),
        ("--color-precision", options.color_precision.to_string()),
        ("--filter-speckle", options.filter_speckle.to_string()),
        ("--splice-threshold", options.splice_threshold.to_string()),
        ("--corner-threshold", options.corner_threshold.to_string()),
        ("--layer-difference", options.layer_difference.to_string()),
        ("--length-threshold", options.length_threshold.to_string()),
        ("--max-iterations", options.max_iterations.to_string()),
        ("--path-precision", options.path_precision.to_string()),
        ("--hierarchical", options.hierarchical.as_flag_value().to_string()),
        ("--mode", options.mode.as_flag_value().to_string()),
    ];

    let mut args = Vec::with_capacity(2 + flags.len() * 2);
    args.push(input.as_os_str().to_owned());
    args.push(output.as_os_str().to_owned());
    for (flag, value) in flags {
        args.push(flag.into());
        args.push(value.into());
    }
    args
}

#[derive(Debug, Default)]
struct Captured {
    bytes: Vec<u8>,
    overflowed: bool,
}

fn drain<R: Read>(reader: Option<R>, limit: Option<usize>) -> io::Result<Captured> {
    let mut captured = Captured::default();
    let Some(mut reader) = reader else {
        return Ok(captured);
    };

    match limit {
        None => {
            reader.read_to_end(&mut captured.bytes)?;
        }
        Some(limit) => {
            (&mut reader)
                .take(limit as u64)
                .read_to_end(&mut captured.bytes)?;
            let discarded = io::copy(&mut reader, &mut io::sink())?;
            captured.overflowed = discarded > 0;
        }
    }
    Ok(captured)
}

fn join_reader(joined: thread::Result<io::Result<Captured>>) -> io::Result<Captured> {
    joined.unwrap_or_else(|_| Err(io::Error::other("engine output reader panicked")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ColorMode, PathMode};

    fn flag_value<'a>(args: &'a [OsString], flag: &str) -> Option<&'a str> {
        args.iter()
            .position(|arg| arg == flag)
            .and_then(|index| args.get(index + 1))
            .and_then(|value| value.to_str())
    }

    mod build_args {
        use super::*;

        mod unit {
            use super::*;

            #[test]
            fn paths_come_first() {
                let args = build_args(
                    &VectorizerOptions::default(),
                    Path::new("in.png"),
                    Path::new("out.svg"),
                );
                assert_eq!(args[0], "in.png");
                assert_eq!(args[1], "out.svg");
                assert_eq!(args.len(), 2 + 11 * 2);
            }

            #[test]
            fn defaults_are_emitted_explicitly() {
                let args = build_args(
                    &VectorizerOptions::default(),
                    Path::new("in.png"),
                    Path::new("out.svg"),
                );

                assert_eq!(flag_value(&args, "--color-mode"), Some("color"));
                assert_eq!(flag_value(&args, "--color-precision"), Some("8"));
                assert_eq!(flag_value(&args, "--filter-speckle"), Some("4"));
                assert_eq!(flag_value(&args, "--splice-threshold"), Some("45"));
                assert_eq!(flag_value(&args, "--corner-threshold"), Some("60"));
                assert_eq!(flag_value(&args, "--layer-difference"), Some("6"));
                assert_eq!(flag_value(&args, "--length-threshold"), Some("4"));
                assert_eq!(flag_value(&args, "--max-iterations"), Some("2"));
                assert_eq!(flag_value(&args, "--path-precision"), Some("5"));
                assert_eq!(flag_value(&args, "--hierarchical"), Some("stacked"));
                assert_eq!(flag_value(&args, "--mode"), Some("spline"));
            }

            #[test]
            fn enum_flags_follow_resolved_members() {
                let options = VectorizerOptions {
                    color_mode: ColorMode::Binary,
                    mode: PathMode::None,
                    ..VectorizerOptions::default()
                };
                let args = build_args(&options, Path::new("a.png"), Path::new("b.svg"));

                assert_eq!(flag_value(&args, "--color-mode"), Some("binary"));
                assert_eq!(flag_value(&args, "--mode"), Some("none"));
            }
        }

        mod prop {
            use super::*;
            use proptest::prelude::*;

            proptest! {
                /// build_args: numeric flags re-parse to exactly the resolved value
                #[test]
                fn numeric_flags_round_trip(
                    precision in any::<i64>(),
                    iterations in any::<i64>(),
                    corner in proptest::num::f64::NORMAL | proptest::num::f64::ZERO,
                    length in 0.0f64..1.0e6,
                ) {
                    let options = VectorizerOptions {
                        color_precision: precision,
                        max_iterations: iterations,
                        corner_threshold: corner,
                        length_threshold: length,
                        ..VectorizerOptions::default()
                    };
                    let args = build_args(&options, Path::new("in.png"), Path::new("out.svg"));

                    let parsed_precision: i64 = flag_value(&args, "--color-precision").unwrap().parse().unwrap();
                    let parsed_iterations: i64 = flag_value(&args, "--max-iterations").unwrap().parse().unwrap();
                    let parsed_corner: f64 = flag_value(&args, "--corner-threshold").unwrap().parse().unwrap();
                    let parsed_length: f64 = flag_value(&args, "--length-threshold").unwrap().parse().unwrap();

                    prop_assert_eq!(parsed_precision, precision);
                    prop_assert_eq!(parsed_iterations, iterations);
                    prop_assert_eq!(parsed_corner, corner);
                    prop_assert_eq!(parsed_length, length);
                }
            }
        }
    }

    #[cfg(unix)]
    mod run {
        use super::*;
        use std::fs;

        /// Stand-in engine: `sh -c <script> engine <args...>`.
        fn shell_engine(script: &str) -> ProcessVectorizer {
            ProcessVectorizer::new("sh").with_leading_args(["-c", script, "engine"])
        }

        mod unit {
            use super::*;

            #[test]
            fn zero_exit_is_success_and_receives_paths_and_flags() {
                let dir = tempfile::tempdir().expect("failed to create temp dir");
                let input = dir.path().join("in.png");
                let output = dir.path().join("out.svg");
                let engine = shell_engine(r#"printf '%s\n' "$@" > "$2.args"; echo '<svg/>' > "$2""#);

                let outcome = engine.convert(&VectorizerOptions::default(), &input, &output);

                assert_eq!(outcome, Outcome::Success);
                assert!(output.exists());
                let recorded = fs::read_to_string(output.with_extension("svg.args")).unwrap();
                let lines: Vec<&str> = recorded.lines().collect();
                assert_eq!(lines[0], input.to_str().unwrap());
                assert_eq!(lines[1], output.to_str().unwrap());
                assert!(lines.contains(&"--hierarchical"));
                assert!(lines.contains(&"--mode"));
            }

            #[test]
            fn nonzero_exit_reports_stderr() {
                let dir = tempfile::tempdir().expect("failed to create temp dir");
                let engine = shell_engine("echo working; echo 'decode failed' >&2; exit 2");

                let outcome = engine.convert(
                    &VectorizerOptions::default(),
                    &dir.path().join("in.png"),
                    &dir.path().join("out.svg"),
                );

                assert_eq!(outcome, Outcome::failure("decode failed"));
            }

            #[test]
            fn nonzero_exit_without_stderr_reports_stdout() {
                let dir = tempfile::tempdir().expect("failed to create temp dir");
                let engine = shell_engine("echo 'unknown flag'; exit 1");

                let outcome = engine.convert(
                    &VectorizerOptions::default(),
                    &dir.path().join("in.png"),
                    &dir.path().join("out.svg"),
                );

                assert_eq!(outcome, Outcome::failure("unknown flag"));
            }

            #[test]
            fn missing_program_is_a_failure() {
                let dir = tempfile::tempdir().expect("failed to create temp dir");
                let engine = ProcessVectorizer::new(dir.path().join("no-such-engine"));

                let outcome = engine.convert(
                    &VectorizerOptions::default(),
                    &dir.path().join("in.png"),
                    &dir.path().join("out.svg"),
                );

                let line = outcome.failure_line().expect("expected failure");
                assert!(line.starts_with("Failed to launch engine"), "{line}");
            }

            #[test]
            fn large_output_is_captured_without_deadlock() {
                let dir = tempfile::tempdir().expect("failed to create temp dir");
                let engine = shell_engine(
                    "i=0; while [ $i -lt 20000 ]; do echo 'xxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxx'; echo 'yyyyyyyyyyyyyyyyyyyyyyyy' >&2; i=$((i+1)); done",
                );

                let finished = engine
                    .run(
                        &VectorizerOptions::default(),
                        &dir.path().join("in.png"),
                        &dir.path().join("out.svg"),
                    )
                    .unwrap();

                assert!(finished.status.success());
                assert_eq!(finished.stdout.len(), 20000 * 33);
                assert_eq!(finished.stderr.len(), 20000 * 25);
            }

            #[test]
            fn output_over_limit_is_a_failure() {
                let dir = tempfile::tempdir().expect("failed to create temp dir");
                let engine = shell_engine(
                    "i=0; while [ $i -lt 100 ]; do echo 'xxxxxxxxxxxxxxxxxxxx'; i=$((i+1)); done",
                )
                .with_output_limit(Some(64));

                let outcome = engine.convert(
                    &VectorizerOptions::default(),
                    &dir.path().join("in.png"),
                    &dir.path().join("out.svg"),
                );

                assert_eq!(outcome, Outcome::failure("Engine output exceeded 64 bytes"));
            }

            #[test]
            fn output_within_limit_is_kept() {
                let dir = tempfile::tempdir().expect("failed to create temp dir");
                let engine = shell_engine("echo 'bad input' >&2; exit 4").with_output_limit(Some(64));

                let outcome = engine.convert(
                    &VectorizerOptions::default(),
                    &dir.path().join("in.png"),
                    &dir.path().join("out.svg"),
                );

                assert_eq!(outcome, Outcome::failure("bad input"));
            }
        }
    }
}
