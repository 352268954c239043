use std::io::Write;

use assert_cmd::Command;
use chrono::{Local, TimeZone};
use predicates::prelude::*;
use serde_json::json;
use tempfile::{tempdir, NamedTempFile};

fn task_file(tasks: serde_json::Value) -> NamedTempFile {
    let mut f = NamedTempFile::new().unwrap();
    write!(f, "{}", tasks).unwrap();
    f
}

fn done_on(day: u32) -> i64 {
    Local.with_ymd_and_hms(2024, 1, day, 14, 30, 0).single().unwrap().timestamp_millis()
}

#[test]
fn generate_prints_markdown_and_merges_archive() {
    let db = tempdir().unwrap();
    let active = task_file(json!([
        {
            "id": "t1", "title": "Review PR", "isDone": false,
            "timeSpentOnDay": { "2024-01-16": 1800000 }
        }
    ]));
    let archive = task_file(json!([
        {
            "id": "t2", "title": "Ship release", "isDone": true, "doneOn": done_on(15),
            "timeSpentOnDay": { "2024-01-15": 7200000 }
        },
        {
            "id": "t1", "title": "Review PR", "isDone": false,
            "timeSpentOnDay": { "2024-01-16": 1800000 }
        }
    ]));

    Command::cargo_bin("taskreport")
        .unwrap()
        .env("REPORTS_DB", db.path().join("reports.json"))
        .args(["generate", "--start", "2024-01-15", "--end", "2024-01-16"])
        .arg("--tasks").arg(active.path())
        .arg("--archive").arg(archive.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "# Task Report: Monday, January 15, 2024 - Tuesday, January 16, 2024",
        ))
        .stdout(predicate::str::contains("- Ship release *(2h)*"))
        .stdout(predicate::str::contains("- Review PR *(30 min)* WIP").count(1));
}

#[test]
fn generate_rejects_reversed_range() {
    let db = tempdir().unwrap();
    let active = task_file(json!([]));
    Command::cargo_bin("taskreport")
        .unwrap()
        .env("REPORTS_DB", db.path().join("reports.json"))
        .args(["generate", "--start", "2024-01-17", "--end", "2024-01-15"])
        .arg("--tasks").arg(active.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("must be before or equal to end date"));
}

#[test]
fn generate_json_and_save_then_list_show_delete() {
    let db = tempdir().unwrap();
    let db_path = db.path().join("reports.json");
    let active = task_file(json!([
        { "id": 1, "title": "Write tests", "isDone": true, "doneOn": done_on(15) }
    ]));

    Command::cargo_bin("taskreport")
        .unwrap()
        .env("REPORTS_DB", &db_path)
        .args(["generate", "--start", "2024-01-15", "--end", "2024-01-15"])
        .args(["--json", "--save", "Monday"])
        .arg("--tasks").arg(active.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("\"totalTasks\": 1"))
        .stderr(predicate::str::contains("Report saved to"));

    let raw = std::fs::read_to_string(&db_path).unwrap();
    let stored: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let id = stored["reports"][0]["id"].as_str().unwrap().to_string();

    Command::cargo_bin("taskreport")
        .unwrap()
        .env("REPORTS_DB", &db_path)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Monday"));

    Command::cargo_bin("taskreport")
        .unwrap()
        .env("REPORTS_DB", &db_path)
        .args(["show", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("- Write tests"));

    Command::cargo_bin("taskreport")
        .unwrap()
        .env("REPORTS_DB", &db_path)
        .args(["delete", &id])
        .assert()
        .success();

    Command::cargo_bin("taskreport")
        .unwrap()
        .env("REPORTS_DB", &db_path)
        .args(["show", &id])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Report not found"));
}

#[test]
fn stored_preferences_apply_when_flags_are_absent() {
    let db = tempdir().unwrap();
    let db_path = db.path().join("reports.json");
    let active = task_file(json!([
        {
            "id": "n", "title": "Noted", "isDone": true, "doneOn": done_on(15),
            "notes": "see ticket"
        }
    ]));

    Command::cargo_bin("taskreport")
        .unwrap()
        .env("REPORTS_DB", &db_path)
        .args(["prefs", "--notes", "true", "--exclude-empty", "true"])
        .assert()
        .success();

    Command::cargo_bin("taskreport")
        .unwrap()
        .env("REPORTS_DB", &db_path)
        .args(["generate", "--start", "2024-01-15", "--end", "2024-01-17"])
        .arg("--tasks").arg(active.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("  see ticket"))
        .stdout(predicate::str::contains("*No tasks*").not());

    Command::cargo_bin("taskreport")
        .unwrap()
        .env("REPORTS_DB", &db_path)
        .args(["generate", "--start", "2024-01-15", "--end", "2024-01-17", "--notes", "false"])
        .arg("--tasks").arg(active.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("see ticket").not());
}
