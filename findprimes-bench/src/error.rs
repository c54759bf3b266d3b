//! The module containing the crate main [`Error`] type

use std::fmt::Display;
use std::os::unix::process::ExitStatusExt;
use std::path::PathBuf;
use std::process::{ExitStatus, Output};

use crate::util::write_all_to_stderr;

/// The main findprimes-bench error type
#[derive(Debug, PartialEq, Clone, Eq)]
pub enum Error {
    /// An invalid sweep configuration
    ///
    /// `ConfigurationError(message)`
    ConfigurationError(String),
    /// An error during the initialization of the runner, like loading the configuration file
    ///
    /// `InitError(message)`
    InitError(String),
    /// The error when trying to start an external [`std::process::Command`] fails
    ///
    /// `LaunchError(executable_path, message)`
    LaunchError(PathBuf, String),
    /// The error when the duration reported by the benchmarked binary can't be parsed
    ///
    /// `ParseError(executable_path, message)`
    ParseError(PathBuf, String),
    /// The error after a successful launch of an external [`std::process::Command`]
    ///
    /// ```text
    /// ProcessError(
    ///     process_name,
    ///     std::process::Output,
    ///     std::process::ExitStatus,
    /// )
    /// ```
    ProcessError(String, Option<Output>, ExitStatus),
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ConfigurationError(message) => {
                write!(f, "Misconfiguration of the sweep: {message}")
            }
            Self::InitError(message) => {
                write!(f, "Failed to initialize findprimes-bench: {message}")
            }
            Self::LaunchError(exec, message) => {
                write!(f, "Error launching '{}': {message}", exec.display())
            }
            Self::ParseError(exec, message) => {
                write!(
                    f,
                    "Error parsing the duration reported by '{}': {message}",
                    exec.display()
                )
            }
            Self::ProcessError(process, output, status) => {
                if let Some(output) = output {
                    write_all_to_stderr(&output.stderr);
                }

                if let Some(code) = status.code() {
                    write!(f, "Error running '{process}': Exit code was: '{code}'")
                } else if let Some(signal) = status.signal() {
                    write!(
                        f,
                        "Error running '{process}': Terminated by a signal '{signal}'"
                    )
                } else {
                    write!(f, "Error running '{process}': Terminated abnormally")
                }
            }
        }
    }
}

impl std::error::Error for Error {}
