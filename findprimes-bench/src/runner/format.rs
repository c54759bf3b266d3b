//! The formatting of the sweep results on stdout

use std::fmt::Write;
use std::io::stdout;

use anyhow::Result;
use colored::Colorize;
use itertools::Itertools;

use super::command::FindPrimesCommand;
use super::summary::{CaseSummary, SummaryFormat, SweepSummary};
use super::sweep::Sweep;
use crate::util::to_string_unsigned_short;

/// The format of the results printed to stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// One line per test case followed by a short result line
    Default,
    /// The [`SweepSummary`] as json without newlines
    Json,
    /// The [`SweepSummary`] as pretty printed json
    PrettyJson,
}

/// Prints the [`SweepSummary`] in the configured [`OutputFormat`]
pub struct SummaryFormatter {
    output_format: OutputFormat,
}

impl SummaryFormatter {
    /// Create a new `SummaryFormatter`
    pub fn new(output_format: OutputFormat) -> Self {
        Self { output_format }
    }

    /// Print the `summary` to stdout
    pub fn print(&self, summary: &SweepSummary) -> Result<()> {
        match self.output_format {
            OutputFormat::Default => {
                for case in &summary.cases {
                    println!("{}", format_case(case));
                }
                println!("{}", format_result_line(summary));
            }
            OutputFormat::Json => {
                summary.write_json(stdout(), SummaryFormat::Json)?;
                println!();
            }
            OutputFormat::PrettyJson => {
                summary.write_json(stdout(), SummaryFormat::PrettyJson)?;
                println!();
            }
        }

        Ok(())
    }
}

/// Format a [`CaseSummary`] as a single line in dictionary style
///
/// `{'file': '8_test_half.txt', 'thread_count': 2, 'durations': [0.5, 0.25]}`
///
/// The `block_size` entry follows the `thread_count` if present.
pub fn format_case(case: &CaseSummary) -> String {
    let mut line = String::new();
    let file = case.file.to_string_lossy();
    // Writing to a String can't fail
    let _ = write!(
        line,
        "{{'file': {}, 'thread_count': {}",
        quote(&file),
        case.thread_count
    );
    if let Some(block_size) = case.block_size {
        let _ = write!(line, ", 'block_size': {block_size}");
    }
    let _ = write!(
        line,
        ", 'durations': [{}]}}",
        case.durations.iter().copied().map(format_duration).join(", ")
    );
    line
}

/// Format the final result line of the default output
pub fn format_result_line(summary: &SweepSummary) -> String {
    format!(
        "\nfindprimes-bench result: {}. {} cases; {} repetitions; {} runs finished in {:>6}s",
        "Ok".green().bold(),
        summary.cases.len(),
        summary.repetitions,
        summary.num_runs(),
        to_string_unsigned_short(summary.total_time)
    )
}

/// Format a duration in the shortest representation which reads back as the same float
///
/// The exponent, if any, carries a sign and at least two digits: `1.5e-05`, `1e+16`.
pub fn format_duration(duration: f64) -> String {
    let repr = format!("{duration:?}");
    match repr.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = exponent
                .strip_prefix('-')
                .map_or(('+', exponent), |digits| ('-', digits));
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        None => repr,
    }
}

/// Print all cases of the `sweep` with the command line to run them
pub fn print_list(sweep: &Sweep, command: &FindPrimesCommand) {
    for case in sweep.cases() {
        println!("{}: benchmark", command.to_command_line(case));
    }
    if !sweep.is_empty() {
        println!();
    }
    println!("{} cases", sweep.len());
}

/// Quote a string with single quotes, switching to double quotes if it contains only single quotes
fn quote(string: &str) -> String {
    let delimiter = if string.contains('\'') && !string.contains('"') {
        '"'
    } else {
        '\''
    };

    let mut quoted = String::with_capacity(string.len() + 2);
    quoted.push(delimiter);
    for char in string.chars() {
        if char == '\\' || char == delimiter {
            quoted.push('\\');
        }
        quoted.push(char);
    }
    quoted.push(delimiter);
    quoted
}
