//! Process-exit contract of failed assertions
//!
//! The terminating cases re-run this test binary as a child process with
//! `TRINITY_LOG_ASSERT_CHILD` set and inspect its exit status.

use std::env;
use std::process::{Command, Output};

use trinity_log::{facade, ErrorReport, LoggerManager, OnFailure, ASSERTION_EXIT_CODE};

const CHILD_ENV: &str = "TRINITY_LOG_ASSERT_CHILD";

fn run_child(test_name: &str) -> Output {
    Command::new(env::current_exe().unwrap())
        .args([test_name, "--exact", "--nocapture", "--test-threads=1"])
        .env(CHILD_ENV, "1")
        .output()
        .unwrap()
}

fn in_child() -> bool {
    env::var_os(CHILD_ENV).is_some()
}

#[test]
fn failed_assertion_terminates_process() {
    if in_child() {
        let manager = LoggerManager::new();
        let _ = manager.assert_cond(false, "boom", None, OnFailure::Terminate);
        return;
    }

    let output = run_child("failed_assertion_terminates_process");
    assert_eq!(output.status.code(), Some(ASSERTION_EXIT_CODE));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("boom"), "{stderr}");
    assert!(stderr.contains("Stack trace:"), "{stderr}");
    assert!(stderr.contains("failed_assertion_terminates_process"), "{stderr}");
}

#[test]
fn required_condition_terminates_process() {
    if in_child() {
        LoggerManager::new().require(1 + 1 == 3, "arithmetic is broken");
        return;
    }

    let output = run_child("required_condition_terminates_process");
    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(ASSERTION_EXIT_CODE));
    assert!(String::from_utf8_lossy(&output.stderr).contains("arithmetic is broken"));
}

#[test]
fn facade_assertion_with_error_terminates_process() {
    if in_child() {
        let err = "x".parse::<u8>().unwrap_err();
        let _ = facade::log_assert(false, "bad cell value", Some(ErrorReport::new(&err)), OnFailure::Terminate);
        return;
    }

    let output = run_child("facade_assertion_with_error_terminates_process");
    assert_eq!(output.status.code(), Some(ASSERTION_EXIT_CODE));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("bad cell value"));
    assert!(stderr.contains("Error trace:"));
    assert!(stderr.contains("ParseIntError"));
}

#[test]
fn failed_assertion_can_propagate() {
    let manager = LoggerManager::new();
    let result = manager.assert_cond(false, "boom", None, OnFailure::Propagate);

    let err = result.unwrap_err();
    assert_eq!(err.message(), "boom");
    assert!(err.to_string().starts_with("assertion failed at "));
    // Still running
    assert!(manager.contains(""));
}
