#![allow(dead_code)]

use std::{path::PathBuf, sync::Mutex};

use chrono::{NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use saifu_core::{config::ConfigManager, core::LedgerManager, storage::CsvLedgerStore};
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

pub struct TestEnv {
    pub base: PathBuf,
    pub ledger_file: PathBuf,
    pub manager: LedgerManager,
    pub config: ConfigManager,
}

/// Creates an isolated CSV-backed manager in a unique directory for each test.
pub fn setup_test_env() -> TestEnv {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);

    let config = ConfigManager::with_base_dir(&base).expect("create config manager");
    let settings = config.load().expect("load default config");
    let ledger_file = settings.resolve_ledger_file(&base);
    let manager = LedgerManager::from_config(&settings, &base);

    TestEnv {
        base,
        ledger_file,
        manager,
        config,
    }
}

/// A store over the same file as `env.manager`, for inspecting backups.
pub fn csv_store(env: &TestEnv) -> CsvLedgerStore {
    CsvLedgerStore::with_backups(&env.ledger_file, env.base.join("backups"), 3)
}

pub fn at(year: i32, month: u32, day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .expect("valid date")
        .and_hms_opt(12, 30, 0)
        .expect("valid time")
}
