use predicates::str::contains;

mod common;
use common::{checklist, init_db_with_data, rti};

#[test]
fn test_daily_total_json() {
    let db_path = init_db_with_data("total_daily_json");

    let out = rti()
        .args([
            "--db", &db_path, "total", "drv-1", "--date", "2025-09-15", "--json",
        ])
        .output()
        .expect("run total");
    assert!(out.status.success());

    let v: serde_json::Value =
        serde_json::from_str(String::from_utf8_lossy(&out.stdout).trim()).expect("valid json");
    assert_eq!(v["seconds"], 3600);
    assert_eq!(v["date"], "2025-09-15");
    assert_eq!(v["driver_id"], "drv-1");
}

#[test]
fn test_weekly_timecard_sums_days() {
    let db_path = init_db_with_data("total_week");

    rti()
        .args(["--db", &db_path, "total", "drv-1", "--week", "2025-09-17"])
        .assert()
        .success()
        .stdout(contains("2025-09-15 → 2025-09-21"))
        .stdout(contains("Total: \u{1b}[1m01h 45m"));

    let out = rti()
        .args([
            "--db", &db_path, "total", "drv-1", "--week", "2025-09-17", "--json",
        ])
        .output()
        .expect("run total");
    let v: serde_json::Value =
        serde_json::from_str(String::from_utf8_lossy(&out.stdout).trim()).expect("valid json");
    assert_eq!(v["total_seconds"], 6300);
    assert_eq!(v["days"].as_array().map(Vec::len), Some(7));
    assert_eq!(v["days"][0]["seconds"], 3600);
    assert_eq!(v["days"][1]["seconds"], 2700);
    assert_eq!(v["days"][2]["sessions"], 0);
}

#[test]
fn test_open_session_counts_up_to_now() {
    let db_path = init_db_with_data("total_live");
    checklist(&db_path, "drv-1", "pre", "2025-09-17T10:00:00Z").success();

    let total_at = |now: &str| -> i64 {
        let out = rti()
            .args([
                "--db",
                &db_path,
                "total",
                "drv-1",
                "--date",
                "2025-09-17",
                "--now",
                now,
                "--json",
            ])
            .output()
            .expect("run total");
        let v: serde_json::Value =
            serde_json::from_str(String::from_utf8_lossy(&out.stdout).trim()).expect("json");
        v["seconds"].as_i64().unwrap_or(-1)
    };

    assert_eq!(total_at("2025-09-17T10:30:00Z"), 1800);
    assert_eq!(total_at("2025-09-17T11:00:00Z"), 3600);
    // A clock reading before the start never goes negative.
    assert_eq!(total_at("2025-09-17T09:00:00Z"), 0);
}

#[test]
fn test_range_timecard_and_bad_range() {
    let db_path = init_db_with_data("total_range");

    rti()
        .args([
            "--db", &db_path, "total", "drv-1", "--from", "2025-09-16", "--to", "2025-09-16",
        ])
        .assert()
        .success()
        .stdout(contains("00h 45m"));

    rti()
        .args([
            "--db", &db_path, "total", "drv-1", "--from", "2025-09-20", "--to", "2025-09-10",
        ])
        .assert()
        .failure()
        .stderr(contains("after range end"));
}

#[test]
fn test_unknown_driver_has_zero_total() {
    let db_path = init_db_with_data("total_unknown_driver");

    rti()
        .args(["--db", &db_path, "total", "nobody", "--date", "2025-09-15"])
        .assert()
        .success()
        .stdout(contains("00h 00m"));
}

#[test]
fn test_huge_range_is_rejected() {
    let db_path = init_db_with_data("total_huge_range");

    rti()
        .args([
            "--db", &db_path, "total", "drv-1", "--from", "0001-01-01", "--to", "9999-12-31",
        ])
        .assert()
        .failure()
        .stderr(contains("at most 366"));
}
