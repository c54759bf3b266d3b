use predicates::prelude::*;
use rstest::rstest;

use crate::common::{Runner, Stub};

#[test]
fn test_when_binary_fails() {
    let stub = Stub::new(
        "echo 'Usage: first parameter is number of thread, second is input file.' >&2\nexit 1",
    );

    Runner::new()
        .binary(&stub)
        .args(&["-t", "1", "-n", "1"])
        .run()
        .failure()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains(
            "Usage: first parameter is number of thread, second is input file.",
        ))
        .stderr(predicate::str::contains("Exit code was: '1'"));
}

#[rstest]
#[case::empty("true")]
#[case::not_a_number("echo 'There was an issue handling input file.' >&2")]
#[case::negative("echo -0.5 >&2")]
fn test_when_duration_is_invalid(#[case] body: &str) {
    let stub = Stub::new(body);

    Runner::new()
        .binary(&stub)
        .args(&["-t", "1", "-n", "1"])
        .run()
        .failure()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains(
            "Error parsing the duration reported by",
        ));
}

#[test]
fn test_sweep_aborts_on_first_error() {
    let stub = Stub::new("if [ \"$1\" = 2 ]; then exit 3; fi\necho 0.1 >&2");

    Runner::new()
        .binary(&stub)
        .args(&["-t", "1,2,3", "-n", "2"])
        .run()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Exit code was: '3'"));

    assert_eq!(stub.calls(), vec!["1 8_test_half.txt", "2 8_test_half.txt"]);
}

#[test]
fn test_when_binary_does_not_exist() {
    Runner::new()
        .args(&["--binary", "./does-not-exist/findprimes", "-n", "1"])
        .run()
        .failure()
        .code(1)
        .stderr(predicate::str::contains(
            "Error launching './does-not-exist/findprimes'",
        ));
}

#[rstest]
#[case::zero_repetitions(&["-n", "0"], "The number of repetitions has to be at least 1")]
#[case::block_size_without_placeholder(
    &["-s", "8", "--args", "{threads} {file}"],
    "arguments '{threads} {file}' don't contain the {block_size} placeholder"
)]
#[case::placeholder_without_block_sizes(
    &["--args", "{block_size} {threads} {file}"],
    "arguments '{block_size} {threads} {file}' contain the {block_size} placeholder but no"
)]
fn test_when_misconfigured(#[case] args: &[&str], #[case] expected: &str) {
    let stub = Stub::threads_as_duration();

    Runner::new()
        .binary(&stub)
        .args(args)
        .run()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Misconfiguration of the sweep"))
        .stderr(predicate::str::contains(expected));

    assert!(stub.calls().is_empty());
}

#[test]
fn test_when_config_file_does_not_exist() {
    Runner::new()
        .args(&["--config", "does/not/exist.yml"])
        .run()
        .failure()
        .code(1)
        .stderr(predicate::str::contains(
            "Failed to initialize findprimes-bench: Failed to open configuration file",
        ));
}
