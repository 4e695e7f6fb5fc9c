// Regression tests: run the binary against a real `sh` session.
// Requires: assert_cmd, predicates crates in [dev-dependencies]
#![cfg(unix)]

use std::path::PathBuf;

use assert_cmd::Command;
use predicates::{prelude::PredicateBooleanExt, str::contains};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
}

fn exemplar() -> Command {
    let mut cmd = Command::cargo_bin("exemplar").unwrap();
    cmd.arg("--config").arg(fixture("sh.yaml")).arg("--color").arg("never");
    cmd
}

#[test]
fn passing_manifest_exits_cleanly() {
    exemplar()
        .arg(fixture("passing.yaml"))
        .assert()
        .success()
        .stderr(contains("Examples: 5  Tried: 5  Errors: 0  Failures: 0"))
        .stderr(contains("###").not());
}

#[test]
fn failures_and_errors_are_reported() {
    exemplar()
        .arg(fixture("mixed.yaml"))
        .assert()
        .failure()
        .stderr(contains("### Failure in mixed.sh:2: expression `echo 2'"))
        .stderr(contains("expected: 3"))
        .stderr(contains("### Error in mixed.sh:8: expression `no_such_command_exemplar'"))
        .stderr(contains("Examples: 4  Tried: 3  Errors: 1  Failures: 1"));
}

#[test]
fn json_summary_goes_to_stdout() {
    exemplar()
        .arg("--json")
        .arg(fixture("mixed.yaml"))
        .assert()
        .failure()
        .stdout(contains(r#""examples":4"#).and(contains(r#""failures":1"#)));
}

#[test]
fn line_exact_strategy_can_be_selected() {
    exemplar()
        .arg("--strategy")
        .arg("line-exact")
        .arg(fixture("passing.yaml"))
        .assert()
        .success();
}

#[test]
fn cli_reports_miette_diagnostics_on_error() {
    let mut cmd = Command::cargo_bin("exemplar").unwrap();
    cmd.arg("--config")
        .arg(fixture("missing.yaml"))
        .arg(fixture("passing.yaml"));
    cmd.assert()
        .failure()
        .stderr(contains("exemplar::config::read").or(contains("missing.yaml")));
}

#[test]
fn unknown_interpreter_is_fatal() {
    exemplar()
        .arg("--interpreter")
        .arg("exemplar-no-such-interpreter")
        .arg(fixture("passing.yaml"))
        .assert()
        .failure()
        .stderr(contains("failed to start interpreter"));
}

#[test]
fn auto_color_stays_plain_when_redirected() {
    let mut cmd = Command::cargo_bin("exemplar").unwrap();
    cmd.env("TERM", "xterm")
        .env_remove("NO_COLOR")
        .arg("--config")
        .arg(fixture("sh.yaml"))
        .arg(fixture("mixed.yaml"));
    cmd.assert()
        .failure()
        .stderr(contains("### Failure in mixed.sh:2"))
        .stderr(contains("\x1b[").not());
}
