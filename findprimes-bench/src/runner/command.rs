//! The module responsible for launching the benchmarked binary and reading its duration

use std::borrow::Cow;
use std::ffi::OsString;
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::str::FromStr;

use anyhow::Result;
use indexmap::IndexMap;
use log::{debug, info, log_enabled, trace, Level};

use super::config::SweepConfig;
use super::sweep::{Measure, TestCase};
use crate::error::Error;
use crate::util::{resolve_binary_path, trim, write_all_to_stderr};

/// The placeholder replaced with the thread count
pub const THREADS_PLACEHOLDER: &str = "{threads}";
/// The placeholder replaced with the input file
pub const FILE_PLACEHOLDER: &str = "{file}";
/// The placeholder replaced with the minimum block size
pub const BLOCK_SIZE_PLACEHOLDER: &str = "{block_size}";

/// The arguments passed to the benchmarked binary with placeholders for the test case parameters
///
/// The template is a shell-like string split into words with `shlex`. Each word may contain the
/// placeholders `{threads}`, `{file}` and `{block_size}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgsTemplate(Vec<String>);

/// The command running the benchmarked `findprimes` binary once per measurement
#[derive(Debug, Clone)]
pub struct FindPrimesCommand {
    args: ArgsTemplate,
    binary: PathBuf,
    current_dir: Option<PathBuf>,
    envs: IndexMap<String, String>,
    nocapture: bool,
}

impl ArgsTemplate {
    /// The default template: `{threads} {file}` or `{threads} {file} {block_size}`
    pub fn default_for(with_block_size: bool) -> Self {
        let mut words = vec![THREADS_PLACEHOLDER.to_owned(), FILE_PLACEHOLDER.to_owned()];
        if with_block_size {
            words.push(BLOCK_SIZE_PLACEHOLDER.to_owned());
        }
        Self(words)
    }

    /// Return true if any word references the `{block_size}` placeholder
    pub fn uses_block_size(&self) -> bool {
        self.0.iter().any(|w| w.contains(BLOCK_SIZE_PLACEHOLDER))
    }

    /// Replace the placeholders with the parameters of the `case`
    ///
    /// A word consisting only of `{file}` is replaced with the file path as is, so non-utf-8
    /// paths survive.
    pub fn render(&self, case: &TestCase) -> Vec<OsString> {
        let threads = case.thread_count.to_string();
        let block_size = case
            .block_size
            .map_or_else(String::new, |size| size.to_string());
        let file = case.file.to_string_lossy();

        self.0
            .iter()
            .map(|word| {
                if word == FILE_PLACEHOLDER {
                    case.file.clone().into_os_string()
                } else {
                    OsString::from(
                        word.replace(THREADS_PLACEHOLDER, &threads)
                            .replace(FILE_PLACEHOLDER, &file)
                            .replace(BLOCK_SIZE_PLACEHOLDER, &block_size),
                    )
                }
            })
            .collect()
    }
}

impl FromStr for ArgsTemplate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        shlex::split(s)
            .ok_or_else(|| format!("Failed to split the arguments template: '{s}'"))
            .map(Self)
    }
}

impl Display for ArgsTemplate {
    /// Words are quoted only if they need quoting apart from the placeholders
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (index, word) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_str(" ")?;
            }
            f.write_str(&quote_word(word).map_err(|_| std::fmt::Error)?)?;
        }
        Ok(())
    }
}

fn quote_word(word: &str) -> Result<Cow<'_, str>, shlex::QuoteError> {
    let stripped = word
        .replace(THREADS_PLACEHOLDER, "")
        .replace(FILE_PLACEHOLDER, "")
        .replace(BLOCK_SIZE_PLACEHOLDER, "");
    if word.is_empty() || (!stripped.is_empty() && shlex::try_quote(&stripped)? != stripped) {
        shlex::try_quote(word)
    } else {
        Ok(Cow::Borrowed(word))
    }
}

impl FindPrimesCommand {
    /// Create a new `FindPrimesCommand` from the [`SweepConfig`]
    ///
    /// The binary is not resolved here. Call [`FindPrimesCommand::resolve`] before measuring.
    pub fn new(config: &SweepConfig, nocapture: bool) -> Self {
        Self {
            args: config.args.clone(),
            binary: config.binary.clone(),
            current_dir: config.current_dir.clone(),
            envs: config.envs.clone(),
            nocapture,
        }
    }

    /// Resolve the binary to an absolute path
    ///
    /// Names without path separators are looked up in the `PATH`, relative paths are relative to
    /// the current directory of this process.
    pub fn resolve(mut self) -> Result<Self> {
        self.binary = resolve_binary_path(&self.binary)
            .map_err(|error| Error::LaunchError(self.binary.clone(), error.to_string()))?;
        Ok(self)
    }

    /// The path to the binary
    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// The arguments template
    pub fn args(&self) -> &ArgsTemplate {
        &self.args
    }

    /// Return the command line for the `case` as it would be run in a shell
    pub fn to_command_line(&self, case: &TestCase) -> String {
        let words: Vec<String> = std::iter::once(self.binary.as_os_str().to_owned())
            .chain(self.args.render(case))
            .map(|s| s.to_string_lossy().to_string())
            .collect();
        shlex::try_join(words.iter().map(String::as_str)).unwrap_or_else(|_| words.join(" "))
    }

    fn command(&self, case: &TestCase) -> Command {
        let mut command = Command::new(&self.binary);
        command.args(self.args.render(case));
        command.envs(&self.envs);

        if let Some(dir) = &self.current_dir {
            command.current_dir(dir);
        }

        // The duration is reported on stderr, so it is always captured
        command.stderr(Stdio::piped());
        if self.nocapture {
            command.stdout(Stdio::inherit());
        } else {
            command.stdout(Stdio::null());
        }
        command.stdin(Stdio::null());
        command
    }
}

impl Measure for FindPrimesCommand {
    fn measure(&mut self, case: &TestCase, repetition: usize) -> Result<f64> {
        debug!(
            "Running '{}' (repetition {})",
            self.to_command_line(case),
            repetition + 1
        );

        let output = self
            .command(case)
            .output()
            .map_err(|error| Error::LaunchError(self.binary.clone(), error.to_string()))?;

        if !output.status.success() {
            let status = output.status;
            return Err(Error::ProcessError(
                self.binary.display().to_string(),
                Some(output),
                status,
            )
            .into());
        }

        trace!("Captured stderr:");
        if log_enabled!(Level::Trace) {
            write_all_to_stderr(&output.stderr);
        }

        let duration = parse_duration(&output.stderr)
            .map_err(|message| Error::ParseError(self.binary.clone(), message))?;

        info!(
            "{} threads={} block_size={}: {duration}s",
            case.file.display(),
            case.thread_count,
            case.block_size
                .map_or_else(|| "-".to_owned(), |size| size.to_string())
        );

        Ok(duration)
    }
}

/// Parse the duration in seconds from the captured `stderr` of the benchmarked binary
///
/// Surrounding whitespace is ignored. The value has to be a finite, non-negative float.
pub fn parse_duration(stderr: &[u8]) -> Result<f64, String> {
    let trimmed = trim(stderr);
    if trimmed.is_empty() {
        return Err("No duration found on stderr".to_owned());
    }

    let string = std::str::from_utf8(trimmed)
        .map_err(|error| format!("The output on stderr is not valid utf-8: {error}"))?;
    let duration = string
        .parse::<f64>()
        .map_err(|error| format!("Expected a floating point number but found '{string}': {error}"))?;

    if !duration.is_finite() {
        return Err(format!("The duration has to be finite but was '{string}'"));
    }
    if duration.is_sign_negative() && duration != 0.0 {
        return Err(format!("The duration has to be non-negative but was '{string}'"));
    }

    Ok(duration)
}
