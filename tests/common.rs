#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Once};
use std::time::Duration;

use once_cell::sync::Lazy;
use prompt_kit::logging::{self, LogGuard, LogRecord, LogSettings, Logger, RotationPolicy, backup_path};
use prompt_kit::openai::{OpenAIClient, RetryPolicy, Sleeper, StubCompletion};
use prompt_kit::{Config, PromptManager};
use serde_json::Value;
use tempfile::TempDir;

static START: Once = Once::new();

/// Shared config for offline tests: fake key, no real waiting between retries.
pub static TEST_CONFIG: Lazy<Config> = Lazy::new(|| {
    Config::with_api_key("sk-test-offline")
        .retry_policy(RetryPolicy::new(3, Duration::from_secs(3)))
});

/// Initialize test environment (.env). Idempotent: safe to call multiple times.
pub fn init() {
    START.call_once(|| {
        let _ = dotenvy::dotenv();
    });
}

/// Log settings pointing into `dir`, console off so test output stays readable.
pub fn log_settings(dir: &Path, rotation: RotationPolicy) -> LogSettings {
    LogSettings {
        dir: dir.to_path_buf(),
        file_prefix: "test_run".to_string(),
        rotation,
        console: false,
    }
}

pub fn init_logger(dir: &Path, rotation: RotationPolicy) -> (Logger, LogGuard) {
    logging::init(&log_settings(dir, rotation)).expect("logger init")
}

pub fn no_sleep() -> Sleeper {
    Arc::new(|_: Duration| {})
}

/// PromptManager over a stub, logging into a fresh temp dir.
pub fn stub_manager(stub: StubCompletion) -> (PromptManager<StubCompletion>, LogGuard, TempDir) {
    let tmp = TempDir::new().expect("tempdir");
    let (logger, guard) = init_logger(tmp.path(), RotationPolicy::default());
    let client = OpenAIClient::new(stub, &TEST_CONFIG, &logger).with_sleeper(no_sleep());
    (PromptManager::new(client, &logger), guard, tmp)
}

/// Active file plus every existing backup, oldest first.
pub fn log_files(active: &Path, backup_count: usize) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = (1..=backup_count)
        .rev()
        .map(|i| backup_path(active, i))
        .filter(|p| p.exists())
        .collect();
    files.push(active.to_path_buf());
    files
}

/// Parse a closed log file, panicking if it is not a JSON array.
pub fn read_records(path: &Path) -> Vec<LogRecord> {
    let text = fs::read_to_string(path).expect("read log file");
    let value: Value = serde_json::from_str(&text)
        .unwrap_or_else(|e| panic!("{} is not valid JSON ({e}):\n{text}", path.display()));
    assert!(value.is_array(), "{} is not a JSON array", path.display());
    serde_json::from_value(value).expect("records")
}

/// Raw JSON objects, for checking which keys are present.
pub fn read_raw(path: &Path) -> Vec<serde_json::Map<String, Value>> {
    let text = fs::read_to_string(path).expect("read log file");
    let value: Value = serde_json::from_str(&text).expect("valid JSON");
    value
        .as_array()
        .expect("array")
        .iter()
        .map(|v| v.as_object().expect("object").clone())
        .collect()
}
