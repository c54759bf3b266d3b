use pretty_assertions::assert_eq;
use predicates::prelude::*;
use rstest::rstest;

use crate::common::{get_fixtures_path, Runner, Stub};

#[test]
fn test_sweep_over_files_and_thread_counts() {
    let stub = Stub::threads_as_duration();

    Runner::new()
        .binary(&stub)
        .args(&["-f", "a.txt,b.txt", "-t", "1,2", "-n", "3"])
        .run()
        .success()
        .stdout(predicate::str::starts_with(
            "{'file': 'a.txt', 'thread_count': 1, 'durations': [0.1, 0.1, 0.1]}\n{'file': \
             'a.txt', 'thread_count': 2, 'durations': [0.2, 0.2, 0.2]}\n{'file': 'b.txt', \
             'thread_count': 1, 'durations': [0.1, 0.1, 0.1]}\n{'file': 'b.txt', \
             'thread_count': 2, 'durations': [0.2, 0.2, 0.2]}\n\nfindprimes-bench result: Ok. 4 \
             cases; 3 repetitions; 12 runs finished in",
        ));

    let round = ["1 a.txt", "2 a.txt", "1 b.txt", "2 b.txt"];
    let expected: Vec<String> = round
        .iter()
        .cycle()
        .take(12)
        .map(|s| (*s).to_owned())
        .collect();
    assert_eq!(stub.calls(), expected);
}

#[test]
fn test_sweep_with_default_parameters() {
    let stub = Stub::threads_as_duration();

    Runner::new()
        .binary(&stub)
        .run()
        .success()
        .stdout(predicate::str::contains(
            "{'file': '8_test_half.txt', 'thread_count': 12, 'durations': [0.12, 0.12, 0.12, \
             0.12]}",
        ))
        .stdout(predicate::str::contains(
            "7 cases; 4 repetitions; 28 runs finished in",
        ));

    let calls = stub.calls();
    assert_eq!(calls.len(), 28);
    assert_eq!(
        &calls[..7],
        &[
            "1 8_test_half.txt",
            "2 8_test_half.txt",
            "3 8_test_half.txt",
            "4 8_test_half.txt",
            "6 8_test_half.txt",
            "8 8_test_half.txt",
            "12 8_test_half.txt",
        ]
    );
}

#[rstest]
#[case::one_repetition("1", 1)]
#[case::five_repetitions("5", 5)]
fn test_sweep_with_block_sizes(#[case] repetitions: &str, #[case] expected: usize) {
    let stub = Stub::new("echo \"0.$3\" >&2");

    Runner::new()
        .binary(&stub)
        .args(&["-t", "2", "-s", "4,8", "-n", repetitions])
        .run()
        .success()
        .stdout(predicate::str::contains(format!(
            "{{'file': '8_test_half.txt', 'thread_count': 2, 'block_size': 4, 'durations': [{}]}}",
            vec!["0.4"; expected].join(", ")
        )))
        .stdout(predicate::str::contains(format!(
            "{{'file': '8_test_half.txt', 'thread_count': 2, 'block_size': 8, 'durations': [{}]}}",
            vec!["0.8"; expected].join(", ")
        )));

    let calls = stub.calls();
    assert_eq!(calls.len(), 2 * expected);
    assert!(calls
        .chunks(2)
        .all(|round| round == ["2 8_test_half.txt 4", "2 8_test_half.txt 8"]));
}

#[test]
fn test_sweep_with_config_file() {
    let stub = Stub::new("echo \"$FINDPRIMES_STUB_DURATION\" >&2");

    Runner::new()
        .binary(&stub)
        .args(&["--config", get_fixtures_path("sweep.yml").to_str().unwrap()])
        .run()
        .success()
        .stdout(predicate::str::starts_with(
            "{'file': 'a.txt', 'thread_count': 1, 'block_size': 16, 'durations': [0.75, 0.75]}\n\
             {'file': 'a.txt', 'thread_count': 2, 'block_size': 16, 'durations': [0.75, 0.75]}\n",
        ));

    assert_eq!(
        stub.calls(),
        vec![
            "1 a.txt --min-block=16",
            "2 a.txt --min-block=16",
            "1 a.txt --min-block=16",
            "2 a.txt --min-block=16",
        ]
    );
}

#[test]
fn test_sweep_with_environment_variables() {
    let stub = Stub::threads_as_duration();

    Runner::new()
        .binary(&stub)
        .env("FINDPRIMES_BENCH_THREAD_COUNTS", "3,5")
        .env("FINDPRIMES_BENCH_REPETITIONS", "1")
        .env("FINDPRIMES_BENCH_FILES", "x.txt")
        .run()
        .success()
        .stdout(predicate::str::starts_with(
            "{'file': 'x.txt', 'thread_count': 3, 'durations': [0.3]}\n{'file': 'x.txt', \
             'thread_count': 5, 'durations': [0.5]}\n",
        ));

    assert_eq!(stub.calls(), vec!["3 x.txt", "5 x.txt"]);
}

#[test]
fn test_sweep_runs_binary_in_current_dir() {
    let stub = Stub::new("test -f marker.txt && echo 1.5 >&2");
    std::fs::write(stub.dir().join("marker.txt"), "").unwrap();

    Runner::new()
        .binary(&stub)
        .args(&["-t", "1", "-n", "1", "--current-dir"])
        .args(&[stub.dir().to_str().unwrap()])
        .run()
        .success()
        .stdout(predicate::str::starts_with(
            "{'file': '8_test_half.txt', 'thread_count': 1, 'durations': [1.5]}\n",
        ));
}

#[test]
fn test_sweep_discards_stdout_of_binary() {
    let stub = Stub::new("echo 2\necho 3\necho 0.5 >&2");

    Runner::new()
        .binary(&stub)
        .args(&["-t", "1", "-n", "1"])
        .run()
        .success()
        .stdout(predicate::str::starts_with(
            "{'file': '8_test_half.txt', 'thread_count': 1, 'durations': [0.5]}\n",
        ));
}

#[test]
fn test_sweep_with_nocapture_shows_stdout_of_binary() {
    let stub = Stub::new("echo 2\necho 3\necho 0.5 >&2");

    Runner::new()
        .binary(&stub)
        .args(&["-t", "1", "-n", "1", "--nocapture"])
        .run()
        .success()
        .stdout(predicate::str::starts_with(
            "2\n3\n{'file': '8_test_half.txt', 'thread_count': 1, 'durations': [0.5]}\n",
        ));
}
