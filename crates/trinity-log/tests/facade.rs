//! End-to-end use of the process-wide facade
//!
//! The facade is global to this test binary, so everything runs in one test.

use std::fs;

use trinity_log::{facade, log_assert, logd, loge, logf, logf_error, logi, logw, LogConfig, LogError, OnFailure};

#[test]
fn facade_end_to_end() {
    // Before init: console-only fallback, nothing on disk
    assert!(!facade::is_initialized());
    logi("before init");
    assert!(facade::logger().file_path().is_none());

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("log").join("app.log");
    let config = LogConfig::default().with_log_path(&path).with_color(false);
    let initialized = facade::init(config.clone()).unwrap();
    assert_eq!(initialized.logger().file_path(), Some(path.as_path()));
    assert!(matches!(facade::init(config), Err(LogError::AlreadyInitialized)));

    logd("debug line");
    let debug_line = line!() - 1;
    logi("info line");
    logw("warning line");
    loge("error line");
    trinity_log::logi!("{} rows written", 12);
    let macro_line = line!() - 1;
    logf("critical line");

    let err = "NaN%".parse::<i64>().unwrap_err();
    logf_error(&err);

    let content = fs::read_to_string(&path).unwrap();
    assert!(!content.contains("before init"));
    assert!(content.contains(&format!(
        " - DEBUG - [{}:facade_end_to_end:{}] - debug line",
        file!(),
        debug_line
    )));
    assert!(content.contains(" - INFO - ["));
    assert!(content.contains(" - WARNING - ["));
    assert!(content.contains(" - ERROR - ["));
    assert!(content.contains(&format!(
        "[{}:facade_end_to_end:{}] - 12 rows written",
        file!(),
        macro_line
    )));
    assert!(content.contains(" - CRITICAL - ["));
    assert!(content.contains("Stack trace:\n  at "));
    assert!(content.contains("ParseIntError: invalid digit found in string"));
    assert!(!content.contains('\x1b'));

    let failure = log_assert(false, "workbook missing", None, OnFailure::Propagate).unwrap_err();
    assert_eq!(failure.message(), "workbook missing");
    assert!(failure.location().starts_with(file!()));
    assert!(log_assert(true, "fine", None, OnFailure::Terminate).is_ok());

    facade::shutdown();
    assert_eq!(facade::logger().sink_count(), 0);
    logi("after shutdown");
    let after = fs::read_to_string(&path).unwrap();
    assert!(!after.contains("after shutdown"));
}
