use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;

mod common;
use common::{checklist, init_db_with_data, init_test_db, rti};

#[test]
fn test_pre_then_post_reports_worked_time() {
    let db_path = init_test_db("checklist_pre_post");

    rti()
        .args([
            "--db",
            &db_path,
            "checklist",
            "drv-7",
            "--kind",
            "pre-trip",
            "--at",
            "2025-09-15T06:30:00Z",
            "--vehicle",
            "bus-12",
            "--item",
            "brakes=pass",
            "--item",
            "mirrors=fail",
        ])
        .assert()
        .success()
        .stdout(contains("started for drv-7"))
        .stdout(contains("work date 2025-09-15"))
        .stdout(contains("Defect reported: mirrors"));

    checklist(&db_path, "drv-7", "post", "2025-09-15T08:15:00Z")
        .success()
        .stdout(contains("ended for drv-7"))
        .stdout(contains("01:45:00"));
}

#[test]
fn test_post_without_pre_fails() {
    let db_path = init_test_db("checklist_post_only");

    checklist(&db_path, "drv-2", "post", "2025-09-15T08:00:00Z")
        .failure()
        .stderr(contains("no active session"));
}

#[test]
fn test_second_pre_is_rejected() {
    let db_path = init_test_db("checklist_double_pre");

    checklist(&db_path, "drv-3", "pre", "2025-09-15T06:00:00Z").success();
    checklist(&db_path, "drv-3", "pre", "2025-09-15T07:00:00Z")
        .failure()
        .stderr(contains("Conflict").and(contains("already has an open session")));

    // Other drivers are unaffected.
    checklist(&db_path, "drv-4", "pre", "2025-09-15T07:00:00Z").success();
}

#[test]
fn test_post_before_start_is_rejected() {
    let db_path = init_test_db("checklist_post_before_pre");

    checklist(&db_path, "drv-5", "pre", "2025-09-15T06:00:00Z").success();
    checklist(&db_path, "drv-5", "post", "2025-09-15T05:00:00Z")
        .failure()
        .stderr(contains("Validation error"));

    // The session is still open and can be closed properly.
    checklist(&db_path, "drv-5", "post", "2025-09-15T07:00:00Z").success();
}

#[test]
fn test_invalid_kind_and_driver() {
    let db_path = init_test_db("checklist_invalid_input");

    checklist(&db_path, "drv-6", "midday", "2025-09-15T06:00:00Z")
        .failure()
        .stderr(contains("invalid checklist kind"));

    checklist(&db_path, "bad driver!", "pre", "2025-09-15T06:00:00Z")
        .failure()
        .stderr(contains("Validation error"));

    rti()
        .args([
            "--db", &db_path, "checklist", "drv-6", "--kind", "pre", "--item", "brakes",
        ])
        .assert()
        .failure();
}

#[test]
fn test_sessions_list_with_details() {
    let db_path = init_db_with_data("sessions_details");

    rti()
        .args([
            "--db", &db_path, "sessions", "drv-1", "--period", "2025-09", "--details",
        ])
        .assert()
        .success()
        .stdout(contains("2025-09-15"))
        .stdout(contains("2025-09-16"))
        .stdout(contains("pre-trip"))
        .stdout(contains("post-trip"))
        .stdout(contains("01h 45m"));
}

#[test]
fn test_sessions_empty_period() {
    let db_path = init_db_with_data("sessions_empty");

    rti()
        .args(["--db", &db_path, "sessions", "drv-1", "--period", "2024"])
        .assert()
        .success()
        .stdout(contains("No sessions"));
}

#[test]
fn test_log_records_checklists() {
    let db_path = init_db_with_data("log_checklists");

    rti()
        .args(["--db", &db_path, "log", "--print"])
        .assert()
        .success()
        .stdout(contains("checklist_pre"))
        .stdout(contains("checklist_post"))
        .stdout(contains("migration_applied"));
}
