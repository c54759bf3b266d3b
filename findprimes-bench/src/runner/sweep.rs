//! The parameter sweep over input files, thread counts and block sizes

use std::num::NonZeroUsize;
use std::path::PathBuf;

use anyhow::Result;
use itertools::iproduct;
use log::{debug, info};

/// Measure the duration of a single [`TestCase`] run
///
/// This is the seam between the orchestration of the [`Sweep`] and the launching of the
/// benchmarked binary.
pub trait Measure {
    /// Run the `case` once and return the reported duration in seconds
    ///
    /// The `repetition` is the zero-based index of the current sweep repetition.
    fn measure(&mut self, case: &TestCase, repetition: usize) -> Result<f64>;
}

/// A single configuration of the sweep together with its recorded durations
#[derive(Debug, Clone, PartialEq)]
pub struct TestCase {
    /// The input file handed to the benchmarked binary
    pub file: PathBuf,
    /// The number of threads
    pub thread_count: NonZeroUsize,
    /// The minimum block size, only present in block size sweeps
    pub block_size: Option<NonZeroUsize>,
    /// The durations in seconds, one per finished repetition
    pub durations: Vec<f64>,
}

/// The Cartesian product of all configured parameters
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Sweep {
    cases: Vec<TestCase>,
}

impl TestCase {
    /// Create a new `TestCase` without any durations
    pub fn new<T>(file: T, thread_count: NonZeroUsize, block_size: Option<NonZeroUsize>) -> Self
    where
        T: Into<PathBuf>,
    {
        Self {
            file: file.into(),
            thread_count,
            block_size,
            durations: Vec::new(),
        }
    }
}

impl Sweep {
    /// Create the `Sweep` from the Cartesian product of the parameters
    ///
    /// The order is files first, then thread counts, then block sizes, so all thread counts of the
    /// first file come before the second file. If `block_sizes` is `None` the cases carry no block
    /// size. An empty parameter list results in an empty `Sweep`.
    pub fn new(
        files: &[PathBuf],
        thread_counts: &[NonZeroUsize],
        block_sizes: Option<&[NonZeroUsize]>,
    ) -> Self {
        let cases = if let Some(block_sizes) = block_sizes {
            iproduct!(files, thread_counts, block_sizes)
                .map(|(file, thread_count, block_size)| {
                    TestCase::new(file.clone(), *thread_count, Some(*block_size))
                })
                .collect()
        } else {
            iproduct!(files, thread_counts)
                .map(|(file, thread_count)| TestCase::new(file.clone(), *thread_count, None))
                .collect()
        };

        Self { cases }
    }

    /// Run the whole sweep `repetitions` times
    ///
    /// Each repetition measures every case exactly once in the order of the cases. The first error
    /// aborts the sweep. The durations collected up to this point stay in the cases.
    pub fn run<M>(&mut self, repetitions: usize, measure: &mut M) -> Result<()>
    where
        M: Measure + ?Sized,
    {
        debug!(
            "Running {} cases with {repetitions} repetitions",
            self.cases.len()
        );
        for repetition in 0..repetitions {
            info!("Repetition {}/{repetitions}", repetition + 1);
            for case in &mut self.cases {
                let duration = measure.measure(case, repetition)?;
                case.durations.push(duration);
            }
        }

        Ok(())
    }

    /// Return all cases of this `Sweep`
    pub fn cases(&self) -> &[TestCase] {
        &self.cases
    }

    /// Return the cases consuming this `Sweep`
    pub fn into_cases(self) -> Vec<TestCase> {
        self.cases
    }

    /// Return the number of cases
    pub fn len(&self) -> usize {
        self.cases.len()
    }

    /// Return true if there are no cases
    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    /// Return true if this is a sweep over block sizes
    pub fn has_block_sizes(&self) -> bool {
        self.cases.iter().any(|c| c.block_size.is_some())
    }
}
