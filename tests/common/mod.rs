use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use expense_tracker::{
    config::ConfigManager,
    core::{Clock, FixedClock},
};
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Config manager rooted in a fresh temporary directory.
pub fn temp_config_manager() -> ConfigManager {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    ConfigManager::with_base_dir(base).expect("create config manager for temp dir")
}

#[allow(dead_code)]
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

#[allow(dead_code)]
pub fn clock_on(year: i32, month: u32, day: u32) -> Arc<dyn Clock> {
    Arc::new(FixedClock::on(date(year, month, day)))
}
