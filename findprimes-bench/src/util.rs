//! This module provides common utility functions
use std::ffi::OsStr;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use log::debug;
use which::which;

/// Trim a slice of `u8` from ascii whitespace
pub fn trim(bytes: &[u8]) -> &[u8] {
    let Some(from) = bytes.iter().position(|x| !x.is_ascii_whitespace()) else {
        return &bytes[0..0];
    };
    let to = bytes
        .iter()
        .rposition(|x| !x.is_ascii_whitespace())
        .unwrap_or(from);
    &bytes[from..=to]
}

/// Dump all data to `stderr`
pub fn write_all_to_stderr(bytes: &[u8]) {
    if !bytes.is_empty() {
        let stderr = io::stderr();
        let stderr = stderr.lock();
        let mut writer = BufWriter::new(stderr);
        // Nothing sensible is left to do if writing to stderr fails
        let _ = writer.write_all(bytes).and_then(|()| writer.flush());
        if bytes.last().is_some_and(|l| *l != b'\n') {
            eprintln!();
        }
    }
}

/// Try to resolve the absolute path of a binary from the `PATH` and relative paths
///
/// If the binary is a name without path separators the PATH is tried, otherwise if not absolute
/// a relative path is tried. If the path is already absolute checks if it is executable.
pub fn resolve_binary_path<T>(binary: T) -> Result<PathBuf>
where
    T: AsRef<OsStr>,
{
    let binary = binary.as_ref();
    match which(binary) {
        Ok(path) => {
            debug!("Found '{}': '{}'", binary.to_string_lossy(), path.display());
            Ok(path)
        }
        Err(error) => Err(
            anyhow! {"{error}: '{0}' could not be found. Is '{0}' built, executable and in the PATH?",
                binary.to_string_lossy()
            },
        ),
    }
}

/// Make a `path` absolute with the `base_dir` as prefix
pub fn make_absolute<B, T>(base_dir: B, path: T) -> PathBuf
where
    B: AsRef<Path>,
    T: AsRef<Path>,
{
    let (base_dir, path) = (base_dir.as_ref(), path.as_ref());
    if path.is_absolute() {
        path.to_owned()
    } else {
        base_dir.join(path)
    }
}

/// Format a positive float as string depending on the number of digits of the integer-part
///
/// The higher the number of integer-part digits the lower the number of fractional-part digits.
pub fn to_string_unsigned_short(n: f64) -> String {
    if n < 10.0f64 {
        format!("{n:.5}")
    } else if n < 100.0f64 {
        format!("{n:.4}")
    } else if n < 1000.0f64 {
        format!("{n:.3}")
    } else if n < 10000.0f64 {
        format!("{n:.2}")
    } else if n < 100_000.0_f64 {
        format!("{n:.1}")
    } else {
        format!("{n:.0}")
    }
}
