#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use std::env;
use std::fs;
use std::path::PathBuf;

/// Binary under test, with its config directory pointed at a scratch dir so
/// no user configuration leaks in.
pub fn rti() -> Command {
    let mut cmd = cargo_bin_cmd!("rtripclock");
    cmd.env("RTRIPCLOCK_HOME", test_home("shared"));
    cmd.env_remove("RUST_LOG");
    cmd
}

/// Same as [`rti`] but with a private config directory.
pub fn rti_in(home: &str) -> Command {
    let mut cmd = cargo_bin_cmd!("rtripclock");
    cmd.env("RTRIPCLOCK_HOME", home);
    cmd.env_remove("RUST_LOG");
    cmd
}

/// Empty config directory for one test.
pub fn test_home(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_rtripclock_home", name));
    let p = path.to_string_lossy().to_string();
    if name != "shared" {
        fs::remove_dir_all(&p).ok();
    }
    fs::create_dir_all(&p).ok();
    p
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_rtripclock.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_out.{}", name, ext));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

/// Fresh database with the schema in place.
pub fn init_test_db(name: &str) -> String {
    let db_path = setup_test_db(name);
    rti()
        .args(["--db", &db_path, "--test", "init"])
        .assert()
        .success();
    db_path
}

/// Submit a checklist at an RFC 3339 instant.
pub fn checklist(db_path: &str, driver: &str, kind: &str, at: &str) -> assert_cmd::assert::Assert {
    rti()
        .args(["--db", db_path, "checklist", driver, "--kind", kind, "--at", at])
        .assert()
}

/// Two closed sessions for `drv-1`: Mon 2025-09-15 (1h) and Tue 2025-09-16 (45m).
pub fn init_db_with_data(name: &str) -> String {
    let db_path = init_test_db(name);
    checklist(&db_path, "drv-1", "pre", "2025-09-15T06:00:00Z").success();
    checklist(&db_path, "drv-1", "post", "2025-09-15T07:00:00Z").success();
    checklist(&db_path, "drv-1", "pre", "2025-09-16T14:00:00Z").success();
    checklist(&db_path, "drv-1", "post", "2025-09-16T14:45:00Z").success();
    db_path
}
