//! The runner orchestrating the sweep

pub mod args;
pub mod command;
pub mod config;
pub mod format;
pub mod summary;
pub mod sweep;

use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use log::{debug, info};

use self::args::CommandLineArgs;
use self::command::FindPrimesCommand;
use self::config::{ConfigFile, SweepConfig};
use self::format::{print_list, SummaryFormatter};
use self::summary::SweepSummary;

/// The environment variables which are not part of the [`CommandLineArgs`]
pub mod envs {
    /// Configure the colored output (`never`, `always` or `auto`)
    pub const FINDPRIMES_BENCH_COLOR: &str = "FINDPRIMES_BENCH_COLOR";
    /// Configure the log level like `RUST_LOG`
    pub const FINDPRIMES_BENCH_LOG: &str = "FINDPRIMES_BENCH_LOG";

    /// The color configuration of cargo used as fallback for [`FINDPRIMES_BENCH_COLOR`]
    pub const CARGO_TERM_COLOR: &str = "CARGO_TERM_COLOR";
}

/// Parse the command-line arguments and run the sweep
pub fn run() -> Result<()> {
    run_with_args(&CommandLineArgs::parse())
}

/// Run the sweep configured by `args` and print the results
///
/// Each configuration is measured once per repetition, strictly one process after the other. The
/// results are printed only after the whole sweep has finished.
pub fn run_with_args(args: &CommandLineArgs) -> Result<()> {
    let file = match &args.config {
        Some(path) => ConfigFile::load(path)?,
        None => ConfigFile::default(),
    };
    let config = SweepConfig::new(file, args)?;
    let mut sweep = config.sweep();
    let command = FindPrimesCommand::new(&config, args.nocapture);

    if args.list {
        print_list(&sweep, &command);
        return Ok(());
    }

    let mut command = command.resolve()?;
    debug!(
        "Benchmarking '{}' with {} cases{}",
        command.binary().display(),
        sweep.len(),
        if sweep.has_block_sizes() {
            " over block sizes"
        } else {
            ""
        }
    );

    let start = Instant::now();
    sweep.run(config.repetitions, &mut command)?;
    let total_time = start.elapsed();
    info!(
        "Finished {} cases in {:.3}s",
        sweep.len(),
        total_time.as_secs_f64()
    );

    let summary = SweepSummary::new(
        command.binary(),
        command.args().to_string(),
        config.repetitions,
        sweep.into_cases(),
        total_time,
    );

    if let Some(path) = &args.save_summary {
        debug!("Saving summary to '{}'", path.display());
        summary.save(path, args.summary_format)?;
    }

    SummaryFormatter::new(args.output_format).print(&summary)
}
