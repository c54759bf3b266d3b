//! The findprimes-bench library
//!
//! Runs an external `findprimes` executable over the Cartesian product of input files, thread
//! counts and optionally minimum block sizes, and collects the durations the executable reports on
//! stderr.

pub mod error;
pub mod runner;
pub mod util;
