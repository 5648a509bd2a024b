//! Integration tests for tagged rolling-file loggers

use std::fs;
use std::path::Path;

use kickshaws::logger::{LogLevel, LogRotation, LoggerConfig, LoggerRegistry};
use tempfile::tempdir;

/// Concatenated contents of every log file whose name starts with `tag`.
fn read_tag_logs(dir: &Path, tag: &str) -> String {
    let mut contents = String::new();
    for entry in fs::read_dir(dir).unwrap() {
        let entry = entry.unwrap();
        if entry.file_name().to_string_lossy().starts_with(tag) {
            contents.push_str(&fs::read_to_string(entry.path()).unwrap());
        }
    }
    contents
}

fn config_in(dir: &Path) -> LoggerConfig {
    LoggerConfig {
        dir: dir.to_path_buf(),
        ..LoggerConfig::default()
    }
}

#[test]
fn test_info_line_has_level_caller_and_message() {
    let dir = tempdir().unwrap();
    let registry = LoggerRegistry::new(config_in(dir.path()));

    let logger = registry.logger("import").unwrap();
    logger.info("Kickshaws library!");

    let contents = read_tag_logs(dir.path(), "import");
    assert!(contents.contains("Kickshaws library!"), "log was: {}", contents);
    assert!(contents.contains("INFO"));
    assert!(contents.contains("logger_test.rs"));
}

#[test]
fn test_each_tag_writes_its_own_file() {
    let dir = tempdir().unwrap();
    let registry = LoggerRegistry::new(config_in(dir.path()));

    registry.logger("alpha").unwrap().warn("from alpha");
    registry.logger("beta").unwrap().error("from beta");

    let alpha = read_tag_logs(dir.path(), "alpha");
    let beta = read_tag_logs(dir.path(), "beta");
    assert!(alpha.contains("from alpha") && !alpha.contains("from beta"));
    assert!(beta.contains("from beta") && !beta.contains("from alpha"));
    assert!(beta.contains("ERROR"));
}

#[test]
fn test_level_filter_drops_lower_levels() {
    let dir = tempdir().unwrap();
    let registry = LoggerRegistry::new(LoggerConfig {
        level: LogLevel::Warn,
        ..config_in(dir.path())
    });

    let logger = registry.logger("quiet").unwrap();
    logger.debug("debug detail");
    logger.info("routine");
    logger.warn("something odd");

    let contents = read_tag_logs(dir.path(), "quiet");
    assert!(!contents.contains("debug detail"));
    assert!(!contents.contains("routine"));
    assert!(contents.contains("something odd"));
}

#[test]
fn test_never_rotation_uses_single_file() {
    let dir = tempdir().unwrap();
    let registry = LoggerRegistry::new(LoggerConfig {
        rotation: LogRotation::Never,
        ..config_in(dir.path())
    });

    let logger = registry.logger("single").unwrap();
    logger.info("first");
    logger.info("second");

    assert!(dir.path().join("single.log").is_file());
    let contents = read_tag_logs(dir.path(), "single");
    assert!(contents.contains("first") && contents.contains("second"));
}

#[test]
fn test_logger_does_not_touch_global_subscriber() {
    let dir = tempdir().unwrap();
    let registry = LoggerRegistry::new(config_in(dir.path()));
    registry.logger("scoped").unwrap().info("scoped only");

    // Events outside a tagged logger go to the global default, not the file.
    tracing::info!("global event");

    let contents = read_tag_logs(dir.path(), "scoped");
    assert!(contents.contains("scoped only"));
    assert!(!contents.contains("global event"));
}
