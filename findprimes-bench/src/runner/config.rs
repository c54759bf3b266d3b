//! The sweep configuration merged from defaults, the configuration file and the command-line

mod defaults {
    pub const BINARY: &str = "./findprimes";
    pub const FILES: [&str; 1] = ["8_test_half.txt"];
    pub const REPETITIONS: usize = 4;
    pub const THREAD_COUNTS: [usize; 7] = [1, 2, 3, 4, 6, 8, 12];
}

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use anyhow::Result;
use indexmap::IndexMap;
use log::debug;
use serde::Deserialize;

use super::args::CommandLineArgs;
use super::command::ArgsTemplate;
use super::sweep::Sweep;
use crate::error::Error;
use crate::util::make_absolute;

/// The content of the yaml configuration file
///
/// All keys are optional. Unknown keys are rejected.
///
/// ```yaml
/// binary: ./findprimes
/// repetitions: 4
/// files: [8_test_half.txt]
/// thread_counts: [1, 2, 4, 8]
/// block_sizes: [1, 16, 256]
/// args: "{threads} {file} {block_size}"
/// current_dir: data
/// envs:
///   OMP_PROC_BIND: "true"
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// The path to the benchmarked binary
    pub binary: Option<PathBuf>,
    /// How often the whole sweep is repeated
    pub repetitions: Option<usize>,
    /// The input files
    pub files: Option<Vec<PathBuf>>,
    /// The thread counts
    pub thread_counts: Option<Vec<usize>>,
    /// The minimum block sizes
    pub block_sizes: Option<Vec<usize>>,
    /// The arguments template
    pub args: Option<String>,
    /// The working directory of the binary
    ///
    /// A relative path is relative to the directory of the configuration file.
    pub current_dir: Option<PathBuf>,
    /// Additional environment variables of the binary
    #[serde(default)]
    pub envs: IndexMap<String, String>,
}

/// The validated configuration of a sweep
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepConfig {
    /// The arguments template
    pub args: ArgsTemplate,
    /// The path to the benchmarked binary, not resolved yet
    pub binary: PathBuf,
    /// The minimum block sizes if this is a block size sweep
    pub block_sizes: Option<Vec<NonZeroUsize>>,
    /// The working directory of the binary
    pub current_dir: Option<PathBuf>,
    /// Additional environment variables of the binary
    pub envs: IndexMap<String, String>,
    /// The input files
    pub files: Vec<PathBuf>,
    /// How often the whole sweep is repeated
    pub repetitions: usize,
    /// The thread counts
    pub thread_counts: Vec<NonZeroUsize>,
}

impl ConfigFile {
    /// Load the `ConfigFile` from a yaml file at `path`
    ///
    /// A relative `current_dir` is made absolute with the directory of `path` as base.
    pub fn load(path: &Path) -> Result<Self> {
        debug!("Loading configuration file '{}'", path.display());
        let yaml = std::fs::read_to_string(path).map_err(|error| {
            Error::InitError(format!(
                "Failed to open configuration file '{}': {error}",
                path.display()
            ))
        })?;
        let mut config = Self::from_yaml_str(&yaml).map_err(|error| {
            Error::InitError(format!(
                "Failed to parse configuration file '{}': {error}",
                path.display()
            ))
        })?;

        if let Some(current_dir) = config.current_dir.take() {
            let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
            config.current_dir = Some(make_absolute(base_dir, current_dir));
        }

        Ok(config)
    }

    /// Parse the `ConfigFile` from a yaml string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }
}

impl SweepConfig {
    /// Merge the command-line `args` over the `file` and the defaults and validate the result
    pub fn new(file: ConfigFile, args: &CommandLineArgs) -> Result<Self> {
        let binary = args
            .binary
            .clone()
            .or(file.binary)
            .unwrap_or_else(|| PathBuf::from(defaults::BINARY));

        let repetitions = args
            .repetitions
            .or(file.repetitions)
            .unwrap_or(defaults::REPETITIONS);
        if repetitions == 0 {
            return Err(config_error("The number of repetitions has to be at least 1"));
        }

        let files = args
            .files
            .clone()
            .or(file.files)
            .unwrap_or_else(|| defaults::FILES.iter().map(PathBuf::from).collect());
        if files.is_empty() {
            return Err(config_error("At least one input file is required"));
        }

        let thread_counts = match (&args.thread_counts, file.thread_counts) {
            (Some(thread_counts), _) => thread_counts.clone(),
            (None, Some(thread_counts)) => to_non_zero("thread count", &thread_counts)?,
            (None, None) => to_non_zero("thread count", &defaults::THREAD_COUNTS)?,
        };
        if thread_counts.is_empty() {
            return Err(config_error("At least one thread count is required"));
        }

        let block_sizes = match (&args.block_sizes, file.block_sizes) {
            (Some(block_sizes), _) => Some(block_sizes.clone()),
            (None, Some(block_sizes)) => Some(to_non_zero("block size", &block_sizes)?),
            (None, None) => None,
        };
        if block_sizes.as_ref().is_some_and(Vec::is_empty) {
            return Err(config_error(
                "The list of block sizes is empty. Remove it to run without block sizes",
            ));
        }

        let template = match (&args.args, file.args) {
            (Some(template), _) => template.clone(),
            (None, Some(template)) => template
                .parse::<ArgsTemplate>()
                .map_err(Error::ConfigurationError)?,
            (None, None) => ArgsTemplate::default_for(block_sizes.is_some()),
        };
        match (block_sizes.is_some(), template.uses_block_size()) {
            (true, false) => {
                return Err(config_error(&format!(
                    "Block sizes are configured but the arguments '{template}' don't contain the \
                     {{block_size}} placeholder"
                )));
            }
            (false, true) => {
                return Err(config_error(&format!(
                    "The arguments '{template}' contain the {{block_size}} placeholder but no \
                     block sizes are configured"
                )));
            }
            _ => {}
        }

        let current_dir = args.current_dir.clone().or(file.current_dir);

        let config = Self {
            args: template,
            binary,
            block_sizes,
            current_dir,
            envs: file.envs,
            files,
            repetitions,
            thread_counts,
        };
        debug!("Sweep configuration: {config:?}");

        Ok(config)
    }

    /// Create the [`Sweep`] of this configuration
    pub fn sweep(&self) -> Sweep {
        Sweep::new(
            &self.files,
            &self.thread_counts,
            self.block_sizes.as_deref(),
        )
    }
}

fn config_error(message: &str) -> anyhow::Error {
    Error::ConfigurationError(message.to_owned()).into()
}

fn to_non_zero(name: &str, values: &[usize]) -> Result<Vec<NonZeroUsize>> {
    values
        .iter()
        .map(|value| {
            NonZeroUsize::new(*value)
                .ok_or_else(|| config_error(&format!("A {name} has to be greater than 0")))
        })
        .collect()
}
