//! The `findprimes-bench` binary
use std::io::Write;

use colored::{control, Colorize};
use env_logger::Env;
use findprimes_bench::runner::envs;
use log::error;

/// The main function of the `findprimes-bench` binary
///
/// We initialize the logging interface and configure the usage of colors as early as possible here.
/// Then we call the main [`findprimes_bench::runner::run`] library function catching and printing
/// errors.
fn main() {
    // Configure the colored crate to respect FINDPRIMES_BENCH_COLOR and CARGO_TERM_COLOR
    let bench_color = std::env::var(envs::FINDPRIMES_BENCH_COLOR).ok();
    if let Some(var) = bench_color
        .clone()
        .or_else(|| std::env::var(envs::CARGO_TERM_COLOR).ok())
    {
        if var == "never" {
            control::set_override(false);
        } else if var == "always" {
            control::set_override(true);
        } else {
            // do nothing
        }
    }

    // Configure the env_logger crate to respect FINDPRIMES_BENCH_COLOR and CARGO_TERM_COLOR
    env_logger::Builder::from_env(
        Env::default()
            .filter_or(envs::FINDPRIMES_BENCH_LOG, "warn")
            .write_style(bench_color.map_or_else(
                || envs::CARGO_TERM_COLOR,
                |_| envs::FINDPRIMES_BENCH_COLOR,
            )),
    )
    .format(|buf, record| {
        writeln!(
            buf,
            "{}: {:<5}: {}",
            record
                .module_path()
                .unwrap_or_else(|| record.module_path_static().unwrap_or("???")),
            match record.level() {
                log::Level::Error => "Error".red().bold(),
                log::Level::Warn => "Warn".yellow().bold(),
                log::Level::Info => "Info".green().bold(),
                log::Level::Debug => "Debug".blue().bold(),
                log::Level::Trace => "Trace".cyan().bold(),
            },
            record.args()
        )
    })
    .init();

    if let Err(error) = findprimes_bench::runner::run() {
        error!("{error}");
        std::process::exit(1)
    }
}
