//! End-to-end runs of the demo binary

use assert_cmd::Command;
use predicates::prelude::*;

fn demo() -> Command {
    let mut cmd = Command::cargo_bin("alloc-demo").unwrap();
    cmd.env_remove("RUST_LOG")
        .env_remove("NEBULA_ALLOC_STRATEGY")
        .env_remove("NEBULA_ALLOC_CONTAINER")
        .env_remove("NEBULA_ALLOC_COUNT");
    cmd
}

fn occurrences(needle: &'static str, expected: usize) -> impl Predicate<[u8]> {
    predicate::function(move |out: &str| out.matches(needle).count() == expected).from_utf8()
}

#[test]
fn test_default_run_covers_all_scenarios() {
    demo()
        .assert()
        .success()
        .stdout(predicate::str::contains("Normal list memory allocation"))
        .stdout(predicate::str::contains("Normal vector memory allocation"))
        .stdout(predicate::str::contains("Custom allocator list memory allocation"))
        .stdout(predicate::str::contains("Custom allocator vector memory allocation"))
        .stdout(occurrences("Person created", 12))
        .stdout(occurrences("Person destroyed", 12))
        // Payload is above 1 KiB, so the vector grows 1, 2, 4
        .stderr(predicate::str::contains("allocate 1 element(s) of size 2052 at: "))
        .stderr(predicate::str::contains("deallocate 4 element(s) of size 2052 at: "));
}

#[test]
fn test_shared_ledger_reports_balance() {
    demo()
        .args(["--strategy", "shared", "--container", "list", "--skip-baseline"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Normal").not())
        .stdout(occurrences("Person created", 3))
        .stdout(predicate::str::contains(
            "Shared ledger: 0 live allocation(s), 0 live construction(s)",
        ));
}

#[test]
fn test_env_fallback_and_verbose_lines() {
    demo()
        .env("NEBULA_ALLOC_STRATEGY", "pass-through")
        .env("NEBULA_ALLOC_CONTAINER", "vec")
        .env("NEBULA_ALLOC_COUNT", "2")
        .args(["--skip-baseline", "--verbose"])
        .assert()
        .success()
        .stdout(occurrences("Person created", 2))
        .stderr(occurrences("construct 1 element(s) of size 2052", 2))
        .stderr(occurrences("destroy 1 element(s) of size 2052", 2));
}

#[test]
fn test_empty_run_allocates_nothing() {
    demo()
        .args(["--count", "0", "--skip-baseline"])
        .assert()
        .success()
        .stderr(predicate::str::contains("allocate").not());
}

#[test]
fn test_unknown_strategy_is_rejected() {
    demo()
        .args(["--strategy", "pooled"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value 'pooled'"));
}
