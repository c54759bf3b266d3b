//! The command-line arguments of the `findprimes-bench` binary

use std::num::NonZeroUsize;
use std::path::PathBuf;

use clap::{ArgAction, Parser};

use super::command::ArgsTemplate;
use super::format::OutputFormat;
use super::summary::SummaryFormat;

/// The command line arguments of `findprimes-bench`
///
/// All arguments are optional. Arguments which are not given fall back to the configuration file
/// (`--config`) and then to the built-in defaults.
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(
    author,
    version,
    about = "Benchmark the findprimes executable over a sweep of thread counts and block sizes",
    long_about = None,
)]
pub struct CommandLineArgs {
    /// A yaml file with the sweep configuration
    ///
    /// Values given on the command-line take precedence over values of this file.
    #[arg(long = "config", short = 'c', env = "FINDPRIMES_BENCH_CONFIG")]
    pub config: Option<PathBuf>,

    /// The path to the benchmarked findprimes binary [default: ./findprimes]
    #[arg(long = "binary", short = 'b', env = "FINDPRIMES_BENCH_BINARY")]
    pub binary: Option<PathBuf>,

    /// How often the whole sweep is repeated [default: 4]
    #[arg(long = "repetitions", short = 'n', env = "FINDPRIMES_BENCH_REPETITIONS")]
    pub repetitions: Option<usize>,

    /// A comma separated list of input files [default: 8_test_half.txt]
    #[arg(
        long = "files",
        short = 'f',
        env = "FINDPRIMES_BENCH_FILES",
        value_delimiter = ',',
        num_args = 1..
    )]
    pub files: Option<Vec<PathBuf>>,

    /// A comma separated list of thread counts [default: 1,2,3,4,6,8,12]
    #[arg(
        long = "thread-counts",
        short = 't',
        env = "FINDPRIMES_BENCH_THREAD_COUNTS",
        value_delimiter = ',',
        num_args = 1..
    )]
    pub thread_counts: Option<Vec<NonZeroUsize>>,

    /// A comma separated list of minimum block sizes
    ///
    /// If present, the sweep additionally iterates over the block sizes.
    #[arg(
        long = "block-sizes",
        short = 's',
        env = "FINDPRIMES_BENCH_BLOCK_SIZES",
        value_delimiter = ',',
        num_args = 1..
    )]
    pub block_sizes: Option<Vec<NonZeroUsize>>,

    /// The arguments passed to the binary
    ///
    /// The placeholders `{threads}`, `{file}` and `{block_size}` are replaced with the parameters
    /// of each run. Defaults to `{threads} {file}` or to `{threads} {file} {block_size}` if block
    /// sizes are configured.
    #[arg(long = "args", env = "FINDPRIMES_BENCH_ARGS", value_parser = parse_args_template)]
    pub args: Option<ArgsTemplate>,

    /// The working directory of the binary
    #[arg(long = "current-dir", env = "FINDPRIMES_BENCH_CURRENT_DIR")]
    pub current_dir: Option<PathBuf>,

    /// Don't discard the output of the binary on stdout
    #[arg(
        long = "nocapture",
        env = "FINDPRIMES_BENCH_NOCAPTURE",
        action = ArgAction::SetTrue,
    )]
    pub nocapture: bool,

    /// Print the test cases and command lines of the sweep without running them
    #[arg(long = "list", action = ArgAction::SetTrue)]
    pub list: bool,

    /// The format of the results printed to stdout
    #[arg(
        long = "output-format",
        env = "FINDPRIMES_BENCH_OUTPUT_FORMAT",
        value_enum,
        default_value = "default"
    )]
    pub output_format: OutputFormat,

    /// Save the summary of the sweep to this file
    #[arg(long = "save-summary", env = "FINDPRIMES_BENCH_SAVE_SUMMARY")]
    pub save_summary: Option<PathBuf>,

    /// The format of the summary file
    #[arg(
        long = "summary-format",
        env = "FINDPRIMES_BENCH_SUMMARY_FORMAT",
        value_enum,
        default_value = "pretty-json"
    )]
    pub summary_format: SummaryFormat,
}

fn parse_args_template(value: &str) -> Result<ArgsTemplate, String> {
    value.parse()
}
