//! The summary of a finished sweep which can be printed or saved as json

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::sweep::TestCase;

/// The version of the summary format
pub const SUMMARY_VERSION: &str = "1";

/// The format (json, ...) in which the summary file should be saved
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum, Serialize, Deserialize)]
pub enum SummaryFormat {
    /// The format in a space optimal json representation without newlines
    Json,
    /// The format in pretty printed json
    PrettyJson,
}

/// The statistics over the durations of a single test case
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    /// The shortest duration
    pub min: f64,
    /// The longest duration
    pub max: f64,
    /// The arithmetic mean
    pub mean: f64,
    /// The median. For an even number of durations the mean of the two middle values
    pub median: f64,
    /// The population standard deviation
    pub stddev: f64,
}

/// The `CaseSummary` of a single test case with all recorded durations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseSummary {
    /// The input file
    pub file: PathBuf,
    /// The number of threads
    pub thread_count: usize,
    /// The minimum block size if this was a block size sweep
    pub block_size: Option<usize>,
    /// The durations in seconds in the order of the repetitions
    pub durations: Vec<f64>,
    /// The statistics if there are any durations
    pub stats: Option<Stats>,
}

/// The `SweepSummary` containing all the information of a finished sweep
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepSummary {
    /// The version of this format. Only backwards incompatible changes cause an increase
    pub version: String,
    /// The path to the benchmarked binary
    pub binary: PathBuf,
    /// The arguments template used to run the binary
    pub args: String,
    /// The configured number of repetitions
    pub repetitions: usize,
    /// The wall clock time of the whole sweep in seconds
    pub total_time: f64,
    /// The summaries of all test cases in the order of the sweep
    pub cases: Vec<CaseSummary>,
}

impl Stats {
    /// Calculate the `Stats` of the `durations`
    ///
    /// Returns `None` if there are no durations.
    pub fn new(durations: &[f64]) -> Option<Self> {
        if durations.is_empty() {
            return None;
        }

        let mut sorted = durations.to_vec();
        sorted.sort_by(f64::total_cmp);

        #[allow(clippy::cast_precision_loss)]
        let len = sorted.len() as f64;
        let mean = sorted.iter().sum::<f64>() / len;
        let variance = sorted.iter().map(|d| (d - mean).powi(2)).sum::<f64>() / len;

        let middle = sorted.len() / 2;
        let median = if sorted.len() % 2 == 0 {
            (sorted[middle - 1] + sorted[middle]) / 2.0
        } else {
            sorted[middle]
        };

        Some(Self {
            min: sorted[0],
            max: sorted[sorted.len() - 1],
            mean,
            median,
            stddev: variance.sqrt(),
        })
    }
}

impl From<TestCase> for CaseSummary {
    fn from(value: TestCase) -> Self {
        Self {
            stats: Stats::new(&value.durations),
            file: value.file,
            thread_count: value.thread_count.get(),
            block_size: value.block_size.map(std::num::NonZeroUsize::get),
            durations: value.durations,
        }
    }
}

impl SweepSummary {
    /// Create a new `SweepSummary` from the finished test cases
    pub fn new<T>(
        binary: &Path,
        args: String,
        repetitions: usize,
        cases: T,
        total_time: Duration,
    ) -> Self
    where
        T: IntoIterator<Item = TestCase>,
    {
        Self {
            version: SUMMARY_VERSION.to_owned(),
            binary: binary.to_owned(),
            args,
            repetitions,
            total_time: total_time.as_secs_f64(),
            cases: cases.into_iter().map(Into::into).collect(),
        }
    }

    /// The total number of runs of the binary
    pub fn num_runs(&self) -> usize {
        self.cases.iter().map(|c| c.durations.len()).sum()
    }

    /// Write this `SweepSummary` in the json `format` into the `writer`
    pub fn write_json<W>(&self, writer: W, format: SummaryFormat) -> Result<()>
    where
        W: Write,
    {
        let result = match format {
            SummaryFormat::Json => serde_json::to_writer(writer, self),
            SummaryFormat::PrettyJson => serde_json::to_writer_pretty(writer, self),
        };
        result.with_context(|| "Failed to serialize to json".to_owned())
    }

    /// Save this `SweepSummary` as json file at `path`
    pub fn save(&self, path: &Path, format: SummaryFormat) -> Result<()> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create summary file '{}'", path.display()))?;
        let mut writer = BufWriter::new(file);
        self.write_json(&mut writer, format)?;
        writer
            .flush()
            .with_context(|| format!("Failed to write summary file '{}'", path.display()))
    }
}
