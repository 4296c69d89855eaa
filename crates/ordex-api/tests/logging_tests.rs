// One subscriber per process: this file holds a single test.

use std::fs;

use ordex::logging::{LogConfig, LogFormat};
use ordex::{Index, IndexConfig, TreeConfig};
use tempfile::TempDir;

#[test]
fn test_file_logging_records_splits() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_path = temp_dir.path().join("ordex.log");

    let guard = LogConfig::debug()
        .with_file(&log_path)
        .with_format(LogFormat::Compact)
        .init()
        .expect("Failed to init logging");
    assert!(guard.is_some());

    let mut index = Index::new(IndexConfig::BTree(TreeConfig::new(3))).unwrap();
    for k in 1..=10 {
        index.insert(k).unwrap();
    }
    drop(guard);

    // second init is rejected
    assert!(LogConfig::info().init().is_err());

    let logs: String = fs::read_dir(temp_dir.path())
        .expect("Failed to read log directory")
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_name().to_string_lossy().starts_with("ordex.log"))
        .map(|entry| fs::read_to_string(entry.path()).unwrap_or_default())
        .collect();
    assert!(logs.contains("b-tree split"), "log output: {}", logs);
}
