#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::{TimeZone, Utc};
use fintrack::FinanceApp;
use fintrack_config::AppConfig;
use fintrack_core::FixedClock;
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Returns a fresh directory that outlives the calling test.
pub fn temp_home() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let path = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    path
}

/// Clock pinned to 2024-01-20 12:00 UTC.
pub fn fixed_clock() -> Arc<FixedClock> {
    Arc::new(FixedClock(Utc.with_ymd_and_hms(2024, 1, 20, 12, 0, 0).unwrap()))
}

/// Opens a JSON-backed app rooted at `home` with the fixed clock.
pub fn open_json_app(home: &Path) -> FinanceApp {
    let config = AppConfig::default().with_data_dir(home);
    FinanceApp::open_with_clock(config, fixed_clock()).expect("open json app")
}

pub fn memory_app() -> FinanceApp {
    FinanceApp::open_with_clock(AppConfig::ephemeral(), fixed_clock()).expect("open memory app")
}
